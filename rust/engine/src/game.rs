use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, RankCounts};
use crate::player::Player;

/// The kind of input a phase waits for. Used in [`crate::errors::GameError::WrongPhase`]
/// and in pending-decision reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    SelectRank,
    Play,
    Challenge,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::SelectRank => "select a rank",
            ActionKind::Play => "play cards",
            ActionKind::Challenge => "decide on a challenge",
        };
        f.write_str(s)
    }
}

/// Input-awaiting states of the turn machine. Challenge resolution, the
/// quad check and turn advance run synchronously inside the call that
/// triggers them, so they never show up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    SelectRank { player: usize },
    AwaitPlay { player: usize },
    AwaitChallenge { claimant: usize, challenger: usize },
    GameOver,
}

impl Phase {
    pub fn expected_action(&self) -> Option<ActionKind> {
        match self {
            Phase::SelectRank { .. } => Some(ActionKind::SelectRank),
            Phase::AwaitPlay { .. } => Some(ActionKind::Play),
            Phase::AwaitChallenge { .. } => Some(ActionKind::Challenge),
            Phase::GameOver => None,
        }
    }

    /// The seat whose input the phase is waiting for.
    pub fn actor(&self) -> Option<usize> {
        match *self {
            Phase::SelectRank { player } | Phase::AwaitPlay { player } => Some(player),
            Phase::AwaitChallenge { challenger, .. } => Some(challenger),
            Phase::GameOver => None,
        }
    }
}

/// Who must act next, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub player: usize,
    pub kind: ActionKind,
}

/// The assertion made by the most recent play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub player: usize,
    pub rank: Rank,
    pub count: usize,
}

/// Face-down pile. Remembers who contributed each card so a seat can be
/// told about its own contributions and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pile {
    cards: Vec<Card>,
    owners: Vec<usize>,
}

impl Pile {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cards_of(&self, player: usize) -> Vec<Card> {
        self.cards
            .iter()
            .zip(&self.owners)
            .filter(|&(_, &owner)| owner == player)
            .map(|(&c, _)| c)
            .collect()
    }

    /// The most recent `count` cards, in play order.
    pub fn top(&self, count: usize) -> &[Card] {
        &self.cards[self.cards.len().saturating_sub(count)..]
    }

    pub(crate) fn push(&mut self, player: usize, cards: &[Card]) {
        self.cards.extend_from_slice(cards);
        self.owners.extend(std::iter::repeat_n(player, cards.len()));
    }

    pub(crate) fn take_all(&mut self) -> Vec<Card> {
        self.owners.clear();
        std::mem::take(&mut self.cards)
    }
}

/// Mutable aggregate owned by the engine. Read access is public; every
/// mutation goes through [`crate::engine::Engine`].
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    pub(crate) pile: Pile,
    pub(crate) active_rank: Option<Rank>,
    pub(crate) claim: Option<Claim>,
    pub(crate) phase: Phase,
    /// Seats still to be offered the current claim, after the one being asked.
    pub(crate) pending_offers: VecDeque<usize>,
    pub(crate) placements: Vec<usize>,
    pub(crate) known_discarded: RankCounts,
    pub(crate) known_revealed: RankCounts,
    pub(crate) turn_count: usize,
}

impl GameState {
    pub(crate) fn new(hands: Vec<Vec<Card>>) -> Self {
        let players = hands
            .into_iter()
            .enumerate()
            .map(|(id, hand)| Player::new(id, hand))
            .collect();
        Self {
            players,
            pile: Pile::default(),
            active_rank: None,
            claim: None,
            phase: Phase::SelectRank { player: 0 },
            pending_offers: VecDeque::new(),
            placements: Vec::new(),
            known_discarded: RankCounts::new(),
            known_revealed: RankCounts::new(),
            turn_count: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: usize) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn active_rank(&self) -> Option<Rank> {
        self.active_rank
    }

    pub fn claim(&self) -> Option<Claim> {
        self.claim
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> Option<usize> {
        self.phase.actor()
    }

    pub fn placements(&self) -> &[usize] {
        &self.placements
    }

    pub fn known_discarded(&self) -> RankCounts {
        self.known_discarded
    }

    pub fn known_revealed(&self) -> RankCounts {
        self.known_revealed
    }

    /// Number of plays made so far.
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Next unplaced seat after `from` in seating order, wrapping around.
    /// `from` itself is only returned when it is the sole active seat.
    pub fn next_active_after(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| self.players[i].is_active())
    }

    /// Every card currently accounted for: hands, pile and discard piles.
    pub fn total_cards(&self) -> usize {
        self.players
            .iter()
            .map(|p| p.hand_size() + p.discarded().len())
            .sum::<usize>()
            + self.pile.len()
    }
}

/// Which hands a snapshot may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only the given seat's own hand; the pile stays face down.
    Seat(usize),
    /// Everything, for debugging and replays.
    All,
    /// No hands at all, for spectators.
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub id: usize,
    pub hand_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
    pub placement: Option<usize>,
    pub discarded: Vec<Card>,
}

/// Owned copy of the table handed to collaborators outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub players: Vec<SeatSnapshot>,
    pub active_rank: Option<Rank>,
    pub pile_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pile: Option<Vec<Card>>,
    pub claim: Option<Claim>,
    pub current_player: Option<usize>,
    pub phase: Phase,
    pub placements: Vec<usize>,
    pub known_discarded: RankCounts,
    pub known_revealed: RankCounts,
    pub turn_count: usize,
}

impl TableSnapshot {
    pub(crate) fn capture(state: &GameState, visibility: Visibility) -> Self {
        let shows = |id: usize| match visibility {
            Visibility::All => true,
            Visibility::Seat(seat) => seat == id,
            Visibility::Public => false,
        };
        let players = state
            .players
            .iter()
            .map(|p| SeatSnapshot {
                id: p.id(),
                hand_size: p.hand_size(),
                hand: shows(p.id()).then(|| p.hand().to_vec()),
                placement: p.placement(),
                discarded: p.discarded().to_vec(),
            })
            .collect();
        Self {
            players,
            active_rank: state.active_rank,
            pile_size: state.pile.len(),
            pile: matches!(visibility, Visibility::All).then(|| state.pile.cards().to_vec()),
            claim: state.claim,
            current_player: state.current_player(),
            phase: state.phase,
            placements: state.placements.clone(),
            known_discarded: state.known_discarded,
            known_revealed: state.known_revealed,
            turn_count: state.turn_count,
        }
    }
}

/// What one seat is allowed to know when it has to decide. Everything here
/// is public information plus the seat's own hand and its own pile cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub seat: usize,
    pub hand: Vec<Card>,
    pub active_rank: Option<Rank>,
    pub claim: Option<Claim>,
    pub pile_size: usize,
    /// Cards this seat has put on the current pile.
    pub my_pile_cards: Vec<Card>,
    pub hand_sizes: Vec<usize>,
    pub active: Vec<bool>,
    pub known_discarded: RankCounts,
    pub known_revealed: RankCounts,
}

impl PlayerView {
    pub(crate) fn capture(state: &GameState, seat: usize) -> Self {
        Self {
            seat,
            hand: state
                .player(seat)
                .map(|p| p.hand().to_vec())
                .unwrap_or_default(),
            active_rank: state.active_rank,
            claim: state.claim,
            pile_size: state.pile.len(),
            my_pile_cards: state.pile.cards_of(seat),
            hand_sizes: state.players.iter().map(Player::hand_size).collect(),
            active: state.players.iter().map(Player::is_active).collect(),
            known_discarded: state.known_discarded,
            known_revealed: state.known_revealed,
        }
    }

    pub fn count_in_hand(&self, rank: Rank) -> usize {
        self.hand.iter().filter(|c| c.rank == rank).count()
    }

    pub fn count_in_my_pile(&self, rank: Rank) -> usize {
        self.my_pile_cards.iter().filter(|c| c.rank == rank).count()
    }

    pub fn active_players(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }
}
