//! Card-counting heuristic policy.
//!
//! The bot keeps no memory between calls; everything it knows comes from the
//! [`PlayerView`]: its own hand, the cards it has put on the current pile,
//! every discarded quad and the public hand sizes.
//!
//! # Challenge model
//!
//! For a claim of `k` cards of rank `r` by a seat whose hand held `n` cards
//! before the play:
//!
//! - `remaining = 4 - (own copies of r + own pile copies of r + discarded r)`
//! - `pool` = cards whose location the bot cannot rule out for the claimant
//! - `p_truthful = P(X >= k)` with `X ~ Hypergeometric(pool, remaining, n)`
//! - `u_challenge = (1 - p) * pile - 0.6 * p * pile`
//! - `u_pass = 0.4 * min(my_active, 3) - threat(claimant hand after play)`
//!
//! The bot challenges iff `u_challenge > u_pass`.

use liar_engine::cards::{Card, Rank, all_ranks};
use liar_engine::deck::GameRng;
use liar_engine::events::ChallengeEvaluation;
use liar_engine::game::{Claim, PlayerView};
use liar_engine::rules::{MAX_PLAY, QUAD};
use rand::seq::IndexedRandom;

use crate::{BotPolicy, ChallengeDecision, PlayDecision};

const DECK_SIZE: usize = 52;
/// Share of the pile a wrong challenge is felt to cost, relative to the gain
/// of a right one. Picking up is bad, but it also ends the run.
const WRONG_CHALLENGE_WEIGHT: f64 = 0.6;
/// Value of each held active-rank card when passing: they keep the run going
/// truthfully.
const ACTIVE_CARD_VALUE: f64 = 0.4;
/// Cost of letting a nearly empty hand keep shedding, per missing card below three.
const FINISH_THREAT: f64 = 0.75;

#[derive(Debug, Clone, Default)]
pub struct HeuristicBot;

impl HeuristicBot {
    pub fn new() -> Self {
        Self
    }

    /// Full evaluation of `claim` from the point of view of `view.seat`.
    pub fn evaluate(view: &PlayerView, claim: Claim) -> ChallengeEvaluation {
        let r = claim.rank;
        let k = claim.count;
        let my_active = view.count_in_hand(r);
        let known = my_active + view.count_in_my_pile(r) + view.known_discarded.get(r) as usize;
        let remaining = QUAD.saturating_sub(known);

        let opp_after = view.hand_sizes.get(claim.player).copied().unwrap_or(0);
        let opp_hand = opp_after + k;
        // cards no longer in the claimant's hand are excluded, the claim itself is not
        let pool = DECK_SIZE
            .saturating_sub(view.hand.len())
            .saturating_sub(view.known_discarded.total())
            .saturating_sub(view.pile_size.saturating_sub(k));

        let p = p_truthful_play(opp_hand, k, remaining, pool);
        let pile = view.pile_size as f64;
        let u_challenge = (1.0 - p) * pile - WRONG_CHALLENGE_WEIGHT * p * pile;
        let u_pass = ACTIVE_CARD_VALUE * my_active.min(3) as f64 - finish_threat(opp_after);

        ChallengeEvaluation {
            p_truthful: p,
            u_challenge,
            u_pass,
            pile: view.pile_size,
            k,
            my_active,
            opp_hand,
        }
    }

    /// Cards to lie with when the active rank is not held: the claim size an
    /// opponent would find most believable, filled from the ranks held fewest
    /// times so near-quads stay in hand.
    fn bluff(view: &PlayerView, rank: Rank) -> Vec<Card> {
        let supply = QUAD
            .saturating_sub(view.count_in_my_pile(rank))
            .saturating_sub(view.known_discarded.get(rank) as usize);
        let typical_opponent = view
            .hand_sizes
            .iter()
            .zip(&view.active)
            .enumerate()
            .filter(|&(i, (_, &active))| i != view.seat && active)
            .map(|(_, (&n, _))| n)
            .min()
            .unwrap_or(0);
        // what the average opponent cannot see: everything but their own hand
        let pool = DECK_SIZE
            .saturating_sub(view.known_discarded.total())
            .saturating_sub(view.pile_size)
            .saturating_sub(typical_opponent);

        let max = view.hand.len().min(MAX_PLAY);
        let mut best = 1;
        let mut best_detect = f64::INFINITY;
        for k in 1..=max {
            let detect = 1.0 - p_truthful_play(view.hand.len(), k, supply, pool);
            // ties go to the larger claim: same risk, more cards shed
            if detect <= best_detect + 1e-9 {
                best = k;
                best_detect = detect.min(best_detect);
            }
        }

        let mut ordered = view.hand.clone();
        ordered.sort_by_key(|c| (view.count_in_hand(c.rank), c.rank, c.suit));
        ordered.truncate(best);
        ordered
    }
}

/// Probability that a hand of `opp_hand` cards, drawn from `pool` unknown
/// cards of which `remaining` have the claimed rank, holds at least `k` of
/// them. `pool` is widened when the counts imply it must be larger.
///
/// ```rust
/// use liar_ai::heuristic::p_truthful_play;
///
/// // not enough copies left anywhere
/// assert_eq!(p_truthful_play(10, 2, 1, 30), 0.0);
/// // every unknown card is the claimed rank
/// assert!((p_truthful_play(4, 2, 4, 4) - 1.0).abs() < 1e-12);
/// ```
pub fn p_truthful_play(opp_hand: usize, k: usize, remaining: usize, pool: usize) -> f64 {
    if k == 0 {
        return 1.0;
    }
    if remaining < k || opp_hand < k {
        return 0.0;
    }
    let pool = pool.max(opp_hand).max(remaining);
    let total = choose(pool, opp_hand);
    if total == 0.0 {
        return 0.0;
    }
    let top = remaining.min(opp_hand);
    let mass: f64 = (k..=top)
        .map(|x| choose(remaining, x) * choose(pool - remaining, opp_hand - x))
        .sum();
    (mass / total).clamp(0.0, 1.0)
}

fn choose(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

fn finish_threat(opp_after: usize) -> f64 {
    if opp_after <= 2 {
        (3 - opp_after) as f64 * FINISH_THREAT
    } else {
        0.0
    }
}

impl BotPolicy for HeuristicBot {
    fn select_rank(&self, view: &PlayerView, rng: &mut GameRng) -> Rank {
        let counts: Vec<(Rank, usize)> = all_ranks()
            .into_iter()
            .map(|r| (r, view.count_in_hand(r)))
            .collect();
        let best = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
        let tied: Vec<Rank> = counts
            .iter()
            .filter(|&&(_, n)| n == best)
            .map(|&(r, _)| r)
            .collect();
        tied.choose(rng).copied().unwrap_or(Rank::Two)
    }

    fn choose_play(&self, view: &PlayerView, _rng: &mut GameRng) -> PlayDecision {
        let Some(rank) = view.active_rank else {
            // only reachable outside the engine's flow: claim the biggest group
            let rank = all_ranks()
                .into_iter()
                .max_by_key(|&r| view.count_in_hand(r))
                .unwrap_or(Rank::Two);
            let cards = view
                .hand
                .iter()
                .filter(|c| c.rank == rank)
                .take(MAX_PLAY)
                .copied()
                .collect();
            return PlayDecision {
                cards,
                claim_rank: rank,
            };
        };
        let truthful: Vec<Card> = view
            .hand
            .iter()
            .filter(|c| c.rank == rank)
            .take(MAX_PLAY)
            .copied()
            .collect();
        let cards = if truthful.is_empty() {
            Self::bluff(view, rank)
        } else {
            truthful
        };
        PlayDecision {
            cards,
            claim_rank: rank,
        }
    }

    fn decide_challenge(&self, view: &PlayerView, _rng: &mut GameRng) -> ChallengeDecision {
        let Some(claim) = view.claim else {
            return ChallengeDecision::plain(false);
        };
        let eval = Self::evaluate(view, claim);
        ChallengeDecision {
            challenge: eval.u_challenge > eval.u_pass,
            evaluation: Some(eval),
        }
    }

    fn name(&self) -> &str {
        "HeuristicBot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liar_engine::cards::RankCounts;
    use liar_engine::deck::seeded_rng;

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn view(hand: &[&str]) -> PlayerView {
        PlayerView {
            seat: 0,
            hand: cards(hand),
            active_rank: None,
            claim: None,
            pile_size: 0,
            my_pile_cards: Vec::new(),
            hand_sizes: vec![hand.len(), 10],
            active: vec![true, true],
            known_discarded: RankCounts::new(),
            known_revealed: RankCounts::new(),
        }
    }

    #[test]
    fn challenges_when_supply_cannot_cover_claim() {
        let mut v = view(&["9♣", "9♦", "9♥"]);
        v.active_rank = Some(Rank::Nine);
        v.claim = Some(Claim {
            player: 1,
            rank: Rank::Nine,
            count: 2,
        });
        v.pile_size = 5;
        v.hand_sizes = vec![3, 5];

        let decision = HeuristicBot::new().decide_challenge(&v, &mut seeded_rng(1));
        let eval = decision.evaluation.clone().unwrap();
        assert_eq!(eval.p_truthful, 0.0);
        assert_eq!(eval.k, 2);
        assert_eq!(eval.my_active, 3);
        assert_eq!(eval.opp_hand, 7);
        assert!(decision.challenge);
    }

    #[test]
    fn passes_when_claim_is_almost_certainly_true() {
        let mut v = view(&["2♣", "3♣", "4♣", "5♣", "6♣"]);
        v.active_rank = Some(Rank::Nine);
        v.claim = Some(Claim {
            player: 1,
            rank: Rank::Nine,
            count: 2,
        });
        v.pile_size = 2;
        v.hand_sizes = vec![5, 2];
        let mut discarded = RankCounts::new();
        for r in all_ranks().into_iter().filter(|&r| r != Rank::Nine).take(10) {
            discarded.add(r, 4);
        }
        discarded.add(Rank::King, 3);
        v.known_discarded = discarded;

        let decision = HeuristicBot::new().decide_challenge(&v, &mut seeded_rng(1));
        let eval = decision.evaluation.unwrap();
        assert!(eval.p_truthful > 0.99, "p = {}", eval.p_truthful);
        assert!(!decision.challenge);
    }

    #[test]
    fn truth_probability_falls_as_claim_grows() {
        let p1 = p_truthful_play(10, 1, 4, 40);
        let p2 = p_truthful_play(10, 2, 4, 40);
        let p3 = p_truthful_play(10, 3, 4, 40);
        assert!(p1 > p2 && p2 > p3 && p3 > 0.0);
    }

    #[test]
    fn truth_probability_falls_as_more_copies_are_seen() {
        let unseen = p_truthful_play(10, 1, 4, 40);
        let some_seen = p_truthful_play(10, 1, 2, 40);
        assert!(unseen > some_seen);
        assert_eq!(p_truthful_play(10, 1, 0, 40), 0.0);
    }

    #[test]
    fn hypergeometric_matches_hand_computation() {
        // one copy left among 10 cards, hand of 5: P(hold it) = 5/10
        assert!((p_truthful_play(5, 1, 1, 10) - 0.5).abs() < 1e-12);
        assert!((choose(52, 5) - 2_598_960.0).abs() < 1e-6);
    }

    #[test]
    fn own_pile_cards_count_as_seen() {
        let mut v = view(&["3♣"]);
        v.claim = Some(Claim {
            player: 1,
            rank: Rank::Jack,
            count: 1,
        });
        v.pile_size = 4;
        let before = HeuristicBot::evaluate(&v, v.claim.unwrap()).p_truthful;
        v.my_pile_cards = cards(&["J♣", "J♦", "J♥"]);
        let after = HeuristicBot::evaluate(&v, v.claim.unwrap()).p_truthful;
        assert!(after < before);
    }

    #[test]
    fn plays_truthfully_when_holding_active_rank() {
        let mut v = view(&["7♣", "7♦", "7♥", "7♠", "2♣"]);
        v.active_rank = Some(Rank::Seven);
        let play = HeuristicBot::new().choose_play(&v, &mut seeded_rng(0));
        assert_eq!(play.cards, cards(&["7♣", "7♦", "7♥"]));
        assert_eq!(play.claim_rank, Rank::Seven);
    }

    #[test]
    fn bluffs_with_least_held_ranks() {
        let mut v = view(&["5♣", "5♦", "5♥", "K♠", "2♦"]);
        v.active_rank = Some(Rank::Nine);
        let play = HeuristicBot::new().choose_play(&v, &mut seeded_rng(0));
        assert_eq!(play.claim_rank, Rank::Nine);
        assert!(!play.cards.is_empty() && play.cards.len() <= 3);
        assert!(play.cards.iter().all(|c| c.rank != Rank::Five || play.cards.len() == 3));
        assert_eq!(play.cards[0], "2♦".parse().unwrap());
    }

    #[test]
    fn bluff_size_shrinks_when_supply_is_exhausted() {
        let mut v = view(&["5♣", "6♦", "8♥", "K♠"]);
        v.active_rank = Some(Rank::Nine);
        v.my_pile_cards = cards(&["9♣", "9♦", "9♥"]);
        v.pile_size = 3;
        let play = HeuristicBot::new().choose_play(&v, &mut seeded_rng(0));
        // one nine could still exist, so only a single-card claim is plausible
        assert_eq!(play.cards.len(), 1);
    }

    #[test]
    fn selects_most_held_rank() {
        let v = view(&["Q♣", "Q♦", "3♥", "Q♠", "3♣"]);
        let rank = HeuristicBot::new().select_rank(&v, &mut seeded_rng(9));
        assert_eq!(rank, Rank::Queen);
    }
}
