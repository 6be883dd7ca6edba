//! Uniformly random policy.
//!
//! Every choice is drawn uniformly from the legal options, with one concession
//! to realism: the chance of challenging rises with the pile and falls with
//! the number of active-rank cards the bot holds itself.

use liar_engine::cards::{Card, Rank, all_ranks};
use liar_engine::deck::GameRng;
use liar_engine::game::PlayerView;
use liar_engine::rules::MAX_PLAY;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{BotPolicy, ChallengeDecision, PlayDecision};

/// Floor and ceiling of the challenge probability.
const MIN_CHALLENGE: f64 = 0.05;
const MAX_CHALLENGE: f64 = 0.6;

#[derive(Debug, Clone, Default)]
pub struct RandomBot;

impl RandomBot {
    pub fn new() -> Self {
        Self
    }

    /// `max(0.05, min(0.6, 0.1 + pile/40) - 0.08 * my_active)`
    pub fn challenge_probability(pile_size: usize, my_active: usize) -> f64 {
        let base = (0.1 + pile_size as f64 / 40.0).min(MAX_CHALLENGE);
        (base - 0.08 * my_active as f64).max(MIN_CHALLENGE)
    }
}

impl BotPolicy for RandomBot {
    fn select_rank(&self, _view: &PlayerView, rng: &mut GameRng) -> Rank {
        all_ranks()[rng.random_range(0..13)]
    }

    fn choose_play(&self, view: &PlayerView, rng: &mut GameRng) -> PlayDecision {
        let max = view.hand.len().min(MAX_PLAY).max(1);
        let count = rng.random_range(1..=max);
        let cards: Vec<_> = view.hand.choose_multiple(rng, count).copied().collect();
        let claim_rank = match view.active_rank {
            Some(rank) => rank,
            // no run open: claim what was mostly played, or lie half the time
            None => {
                if rng.random_bool(0.5) {
                    all_ranks()[rng.random_range(0..13)]
                } else {
                    most_common_rank(&cards).unwrap_or(Rank::Two)
                }
            }
        };
        PlayDecision { cards, claim_rank }
    }

    fn decide_challenge(&self, view: &PlayerView, rng: &mut GameRng) -> ChallengeDecision {
        let my_active = view
            .claim
            .map(|c| view.count_in_hand(c.rank))
            .unwrap_or(0);
        let p = Self::challenge_probability(view.pile_size, my_active);
        ChallengeDecision::plain(rng.random_bool(p))
    }

    fn name(&self) -> &str {
        "RandomBot"
    }
}

fn most_common_rank(cards: &[Card]) -> Option<Rank> {
    all_ranks()
        .into_iter()
        .map(|r| (r, cards.iter().filter(|c| c.rank == r).count()))
        .filter(|&(_, n)| n > 0)
        .max_by_key(|&(_, n)| n)
        .map(|(r, _)| r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liar_engine::cards::RankCounts;
    use liar_engine::deck::seeded_rng;
    use liar_engine::game::Claim;

    fn view(hand: &[&str], active_rank: Option<Rank>) -> PlayerView {
        PlayerView {
            seat: 0,
            hand: hand.iter().map(|s| s.parse::<Card>().unwrap()).collect(),
            active_rank,
            claim: None,
            pile_size: 0,
            my_pile_cards: Vec::new(),
            hand_sizes: vec![hand.len(), 5],
            active: vec![true, true],
            known_discarded: RankCounts::new(),
            known_revealed: RankCounts::new(),
        }
    }

    #[test]
    fn challenge_probability_is_clamped() {
        assert!((RandomBot::challenge_probability(0, 0) - 0.1).abs() < 1e-9);
        assert!((RandomBot::challenge_probability(40, 0) - 0.6).abs() < 1e-9);
        assert!((RandomBot::challenge_probability(0, 3) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn plays_are_legal_and_claim_active_rank() {
        let bot = RandomBot::new();
        let mut rng = seeded_rng(11);
        let v = view(&["2♣", "5♦", "9♥", "K♠", "K♦"], Some(Rank::Seven));
        for _ in 0..200 {
            let play = bot.choose_play(&v, &mut rng);
            assert!((1..=3).contains(&play.cards.len()));
            assert!(play.cards.iter().all(|c| v.hand.contains(c)));
            let mut unique = play.cards.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), play.cards.len());
            assert_eq!(play.claim_rank, Rank::Seven);
        }
    }

    #[test]
    fn single_card_hand_plays_that_card() {
        let bot = RandomBot::new();
        let mut rng = seeded_rng(3);
        let v = view(&["4♣"], Some(Rank::Four));
        let play = bot.choose_play(&v, &mut rng);
        assert_eq!(play.cards, vec!["4♣".parse::<Card>().unwrap()]);
    }

    #[test]
    fn challenge_uses_claim_and_never_attaches_evaluation() {
        let bot = RandomBot::new();
        let mut rng = seeded_rng(8);
        let mut v = view(&["4♣"], Some(Rank::Four));
        v.claim = Some(Claim {
            player: 1,
            rank: Rank::Four,
            count: 1,
        });
        v.pile_size = 1;
        let challenges = (0..500)
            .map(|_| bot.decide_challenge(&v, &mut rng))
            .inspect(|d| assert!(d.evaluation.is_none()))
            .filter(|d| d.challenge)
            .count();
        // p = 0.125 - 0.08 = 0.045 floored to 0.05
        assert!(challenges < 80, "challenged {challenges} times");
    }

    #[test]
    fn most_common_rank_prefers_larger_group() {
        let cards: Vec<Card> = ["3♣", "9♦", "9♥"].iter().map(|s| s.parse().unwrap()).collect();
        assert_eq!(most_common_rank(&cards), Some(Rank::Nine));
        assert_eq!(most_common_rank(&[]), None);
    }
}
