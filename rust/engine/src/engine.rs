use std::collections::VecDeque;

use crate::cards::{full_deck, Card, Rank};
use crate::deck::{deal, seeded_rng, shuffle_with, GameRng};
use crate::errors::GameError;
use crate::events::{ChallengeEvaluation, Event};
use crate::game::{
    ActionKind, Claim, Decision, GameState, Phase, PlayerView, TableSnapshot, Visibility,
};
use crate::player::{Action, Player};
use crate::rules::{self, MAX_PLAYERS, MIN_PLAYERS};

/// Rules engine for one game of Lying/Cheat.
///
/// Owns the [`GameState`] and the append-only event log. Every action is
/// validated in full before anything changes; a rejected action leaves both
/// the state and the log untouched. Accepted actions return the events they
/// produced.
///
/// # Examples
///
/// ```
/// use liar_engine::cards::Rank;
/// use liar_engine::engine::Engine;
/// use liar_engine::game::Phase;
///
/// let mut engine = Engine::new(7, 4).unwrap();
/// assert_eq!(engine.phase(), Phase::SelectRank { player: 0 });
///
/// engine.select_rank(0, Rank::Nine).unwrap();
/// let card = engine.state().players()[0].hand()[0];
/// let events = engine.play(0, &[card]).unwrap();
/// assert_eq!(events[0].kind(), "PLAY");
///
/// // seat 1 is offered the claim first
/// assert_eq!(engine.current_player(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    events: Vec<Event>,
    initial: TableSnapshot,
}

impl Engine {
    /// Shuffle a fresh deck with `seed` and deal it to `n_players`.
    pub fn new(seed: u64, n_players: usize) -> Result<Self, GameError> {
        let mut rng = seeded_rng(seed);
        Self::with_rng(&mut rng, n_players)
    }

    /// Like [`Engine::new`] but draws the shuffle from a caller-owned
    /// generator, which keeps advancing for later decisions.
    pub fn with_rng(rng: &mut GameRng, n_players: usize) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n_players) {
            return Err(GameError::InvalidPlayerCount(n_players));
        }
        let deck = shuffle_with(&full_deck(), rng);
        Self::from_hands(deal(&deck, n_players))
    }

    /// Start a game from explicit hands. Seat 0 selects the first rank.
    /// Hands need not cover the whole deck.
    pub fn from_hands(hands: Vec<Vec<Card>>) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&hands.len()) {
            return Err(GameError::InvalidPlayerCount(hands.len()));
        }
        let state = GameState::new(hands);
        let initial = TableSnapshot::capture(&state, Visibility::All);
        let mut engine = Self {
            state,
            events: Vec::new(),
            initial,
        };
        engine.emit(Event::GameStart);
        engine.check_quads();
        if !engine.end_if_decided() {
            // seat 0 may have been emptied by the opening quad check
            if !engine.state.players[0].is_active() {
                if let Some(next) = engine.state.next_active_after(0) {
                    engine.state.phase = Phase::SelectRank { player: next };
                }
            }
        }
        Ok(engine)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_player(&self) -> Option<usize> {
        self.state.current_player()
    }

    pub fn pending_decision(&self) -> Option<Decision> {
        let phase = self.state.phase;
        Some(Decision {
            player: phase.actor()?,
            kind: phase.expected_action()?,
        })
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state.phase, Phase::GameOver)
    }

    pub fn placements(&self) -> &[usize] {
        &self.state.placements
    }

    pub fn player_count(&self) -> usize {
        self.state.players.len()
    }

    /// Table exactly as dealt, before the opening quad check.
    pub fn initial_snapshot(&self) -> &TableSnapshot {
        &self.initial
    }

    pub fn snapshot(&self, visibility: Visibility) -> TableSnapshot {
        TableSnapshot::capture(&self.state, visibility)
    }

    pub fn view_for(&self, seat: usize) -> PlayerView {
        PlayerView::capture(&self.state, seat)
    }

    pub fn apply(&mut self, player: usize, action: Action) -> Result<Vec<Event>, GameError> {
        match action {
            Action::SelectRank { rank } => self.select_rank(player, rank),
            Action::Play { cards } => self.play(player, &cards),
            Action::Challenge { challenge } => self.decide_challenge(player, challenge),
        }
    }

    /// Open a run. Only legal while the phase is [`Phase::SelectRank`] for
    /// `player`; any of the thirteen ranks may be chosen.
    pub fn select_rank(&mut self, player: usize, rank: Rank) -> Result<Vec<Event>, GameError> {
        self.expect(player, ActionKind::SelectRank)?;
        let mark = self.events.len();
        self.state.active_rank = Some(rank);
        self.state.phase = Phase::AwaitPlay { player };
        self.emit(Event::SelectRank { player, rank });
        Ok(self.events_since(mark))
    }

    /// Place 1-3 cards face down claiming the active rank, then open the
    /// challenge window. An emptied hand is placed at once; the claim stays
    /// challengeable.
    pub fn play(&mut self, player: usize, cards: &[Card]) -> Result<Vec<Event>, GameError> {
        self.expect(player, ActionKind::Play)?;
        rules::validate_play(self.state.players[player].hand(), cards)?;
        let Some(claim_rank) = self.state.active_rank else {
            // AwaitPlay is only entered with a bound rank
            return Err(GameError::WrongPhase {
                expected: ActionKind::SelectRank,
                actual: ActionKind::Play,
            });
        };

        let mark = self.events.len();
        self.state.players[player].remove_cards(cards)?;
        self.state.pile.push(player, cards);
        self.state.claim = Some(Claim {
            player,
            rank: claim_rank,
            count: cards.len(),
        });
        self.state.turn_count += 1;
        self.emit(Event::Play {
            player,
            cards: cards.to_vec(),
            claim_rank,
        });
        if self.state.players[player].hand_size() == 0 {
            self.place(player);
        }

        let mut offers: VecDeque<usize> = self.seats_after(player).collect();
        match offers.pop_front() {
            Some(challenger) => {
                self.state.pending_offers = offers;
                self.state.phase = Phase::AwaitChallenge {
                    claimant: player,
                    challenger,
                };
            }
            None => self.close_unchallenged(player),
        }
        Ok(self.events_since(mark))
    }

    /// Answer the current challenge offer. A pass moves the offer to the
    /// next active seat; a challenge resolves the claim immediately.
    pub fn decide_challenge(
        &mut self,
        challenger: usize,
        challenge: bool,
    ) -> Result<Vec<Event>, GameError> {
        self.expect(challenger, ActionKind::Challenge)?;
        let Phase::AwaitChallenge { claimant, .. } = self.state.phase else {
            return Err(self.wrong_phase(ActionKind::Challenge));
        };

        let mark = self.events.len();
        self.emit(Event::ChallengeDecision {
            challenger,
            challenge,
        });
        if challenge {
            self.resolve_challenge(challenger);
        } else {
            match self.state.pending_offers.pop_front() {
                Some(next) => {
                    self.state.phase = Phase::AwaitChallenge {
                        claimant,
                        challenger: next,
                    };
                }
                None => self.close_unchallenged(claimant),
            }
        }
        Ok(self.events_since(mark))
    }

    /// Attach a diagnostic record to the log for the seat currently offered
    /// the challenge. Changes nothing else.
    pub fn annotate_challenge(
        &mut self,
        challenger: usize,
        message: impl Into<String>,
        eval: Option<ChallengeEvaluation>,
    ) -> Result<Vec<Event>, GameError> {
        self.expect(challenger, ActionKind::Challenge)?;
        let mark = self.events.len();
        self.emit(Event::ChallengeEval {
            challenger,
            message: message.into(),
            eval,
        });
        Ok(self.events_since(mark))
    }

    fn expect(&self, player: usize, kind: ActionKind) -> Result<(), GameError> {
        let phase = self.state.phase;
        let Some(expected) = phase.expected_action() else {
            return Err(GameError::GameAlreadyOver);
        };
        if expected != kind {
            return Err(GameError::WrongPhase {
                expected,
                actual: kind,
            });
        }
        match phase.actor() {
            Some(actor) if actor == player => Ok(()),
            Some(actor) => Err(GameError::NotYourTurn {
                expected: actor,
                actual: player,
            }),
            None => Err(GameError::GameAlreadyOver),
        }
    }

    fn wrong_phase(&self, actual: ActionKind) -> GameError {
        match self.state.phase.expected_action() {
            Some(expected) => GameError::WrongPhase { expected, actual },
            None => GameError::GameAlreadyOver,
        }
    }

    /// Active seats other than `player`, in seating order starting after it.
    fn seats_after(&self, player: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.state.players.len();
        (1..n)
            .map(move |step| (player + step) % n)
            .filter(|&i| self.state.players[i].is_active())
    }

    /// Everyone passed: the claim is released, the run goes on with the same
    /// rank and the next seat after the claimant plays.
    fn close_unchallenged(&mut self, claimant: usize) {
        self.state.claim = None;
        self.state.pending_offers.clear();
        if self.end_if_decided() {
            return;
        }
        if let Some(next) = self.state.next_active_after(claimant) {
            self.state.phase = Phase::AwaitPlay { player: next };
        }
    }

    fn resolve_challenge(&mut self, challenger: usize) {
        let Some(claim) = self.state.claim.take() else {
            return;
        };
        self.state.pending_offers.clear();

        let revealed = self.state.pile.top(claim.count).to_vec();
        let truthful = rules::is_truthful(claim.rank, &revealed);
        for card in &revealed {
            self.state.known_revealed.add(card.rank, 1);
        }
        self.emit(Event::ChallengeResolution {
            challenger,
            truthful,
            revealed,
        });

        let recipient = if truthful { challenger } else { claim.player };
        let cards = self.state.pile.take_all();
        self.state.players[recipient].take_cards(cards.iter().copied());
        self.state.active_rank = None;
        self.emit(Event::PickupPile {
            player: recipient,
            cards,
        });

        self.check_quads();
        if self.end_if_decided() {
            return;
        }
        if let Some(next) = self.state.next_active_after(recipient) {
            self.state.phase = Phase::SelectRank { player: next };
        }
    }

    /// Discard every four-of-a-kind, lowest seat first and lowest rank
    /// first, until no hand holds one. Placed seats discard too; emptied
    /// hands of active seats are placed.
    fn check_quads(&mut self) {
        loop {
            let found = self
                .state
                .players
                .iter()
                .find_map(|p| rules::find_quad(p.hand()).map(|rank| (p.id(), rank)));
            let Some((player, rank)) = found else {
                break;
            };
            let cards = self.state.players[player].discard_rank(rank);
            self.state.known_discarded.add(rank, cards.len() as u8);
            self.emit(Event::DiscardQuad {
                player,
                rank,
                cards,
            });
            if self.state.players[player].hand_size() == 0 {
                self.place(player);
            }
        }
    }

    fn place(&mut self, player: usize) {
        if !self.state.players[player].is_active() {
            return;
        }
        self.state.placements.push(player);
        let place = self.state.placements.len();
        self.state.players[player].set_placement(place);
        self.emit(Event::Placement { player, place });
    }

    /// Finish the game when at most one seat is still active. Returns
    /// whether the game is over.
    fn end_if_decided(&mut self) -> bool {
        if matches!(self.state.phase, Phase::GameOver) {
            return true;
        }
        if self.state.active_count() > 1 {
            return false;
        }
        let remaining: Vec<usize> = self
            .state
            .players
            .iter()
            .filter(|p| p.is_active())
            .map(Player::id)
            .collect();
        for player in remaining {
            self.place(player);
        }
        self.state.claim = None;
        self.state.active_rank = None;
        self.state.pending_offers.clear();
        self.state.phase = Phase::GameOver;
        self.emit(Event::GameEnd {
            placements: self.state.placements.clone(),
        });
        true
    }

    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn events_since(&self, mark: usize) -> Vec<Event> {
        self.events[mark..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn rejects_bad_player_counts() {
        assert_eq!(Engine::new(1, 1).unwrap_err(), GameError::InvalidPlayerCount(1));
        assert_eq!(Engine::new(1, 7).unwrap_err(), GameError::InvalidPlayerCount(7));
        assert!(Engine::new(1, 2).is_ok());
        assert!(Engine::new(1, 6).is_ok());
    }

    #[test]
    fn play_before_rank_selection_is_wrong_phase() {
        let mut engine = Engine::from_hands(vec![cards(&["2♣"]), cards(&["3♣"])]).unwrap();
        let err = engine.play(0, &cards(&["2♣"])).unwrap_err();
        assert_eq!(
            err,
            GameError::WrongPhase {
                expected: ActionKind::SelectRank,
                actual: ActionKind::Play
            }
        );
    }

    #[test]
    fn other_seat_cannot_select_rank() {
        let mut engine = Engine::from_hands(vec![cards(&["2♣"]), cards(&["3♣"])]).unwrap();
        let err = engine.select_rank(1, Rank::Two).unwrap_err();
        assert_eq!(err, GameError::NotYourTurn { expected: 0, actual: 1 });
        assert_eq!(engine.events().len(), 1);
    }

    #[test]
    fn all_pass_keeps_rank_and_moves_to_next_seat() {
        let mut engine = Engine::from_hands(vec![
            cards(&["2♣", "9♦"]),
            cards(&["3♣", "9♥"]),
            cards(&["4♣", "9♠"]),
        ])
        .unwrap();
        engine.select_rank(0, Rank::Nine).unwrap();
        engine.play(0, &cards(&["9♦"])).unwrap();
        assert_eq!(
            engine.phase(),
            Phase::AwaitChallenge { claimant: 0, challenger: 1 }
        );
        engine.decide_challenge(1, false).unwrap();
        assert_eq!(
            engine.phase(),
            Phase::AwaitChallenge { claimant: 0, challenger: 2 }
        );
        engine.decide_challenge(2, false).unwrap();
        assert_eq!(engine.phase(), Phase::AwaitPlay { player: 1 });
        assert_eq!(engine.state().active_rank(), Some(Rank::Nine));
        assert_eq!(engine.state().claim(), None);
        assert_eq!(engine.state().pile().len(), 1);
    }

    #[test]
    fn annotation_only_allowed_for_offered_seat() {
        let mut engine = Engine::from_hands(vec![
            cards(&["2♣", "9♦"]),
            cards(&["3♣", "9♥"]),
            cards(&["4♣", "9♠"]),
        ])
        .unwrap();
        engine.select_rank(0, Rank::Nine).unwrap();
        engine.play(0, &cards(&["9♦"])).unwrap();
        assert!(engine.annotate_challenge(2, "early", None).is_err());
        let events = engine.annotate_challenge(1, "thinking", None).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(engine.phase(), Phase::AwaitChallenge { claimant: 0, challenger: 1 });
    }

    #[test]
    fn opening_quads_are_discarded_after_game_start() {
        let engine = Engine::from_hands(vec![
            cards(&["7♣", "7♦", "7♥", "7♠", "2♣"]),
            cards(&["3♣"]),
        ])
        .unwrap();
        assert_eq!(engine.events()[0], Event::GameStart);
        assert!(matches!(
            engine.events()[1],
            Event::DiscardQuad { player: 0, rank: Rank::Seven, .. }
        ));
        assert_eq!(engine.initial_snapshot().players[0].hand_size, 5);
        assert_eq!(engine.state().players()[0].hand_size(), 1);
        assert_eq!(engine.state().known_discarded().get(Rank::Seven), 4);
    }

    #[test]
    fn seat_emptied_by_opening_quads_does_not_start() {
        let engine = Engine::from_hands(vec![
            cards(&["7♣", "7♦", "7♥", "7♠"]),
            cards(&["3♣"]),
            cards(&["4♣"]),
        ])
        .unwrap();
        assert_eq!(engine.placements(), &[0]);
        assert_eq!(engine.phase(), Phase::SelectRank { player: 1 });
    }
}
