//! Table driver: one engine, one seeded generator, one controller per seat.

use std::fmt;
use std::str::FromStr;

use liar_engine::deck::{GameRng, seeded_rng};
use liar_engine::engine::Engine;
use liar_engine::errors::GameError;
use liar_engine::events::Event;
use liar_engine::game::ActionKind;
use liar_engine::player::Action;
use liar_engine::replay::{Replay, ReplayError};
use thiserror::Error;

use crate::{BotKind, BotPolicy, UnknownBot, create_bot};

/// Plays after which a game is abandoned as stalled.
pub const DEFAULT_MAX_PLAYS: usize = 10_000;

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    Bot(BotKind),
    Human,
}

impl SeatKind {
    pub fn label(self) -> &'static str {
        match self {
            SeatKind::Bot(kind) => kind.as_str(),
            SeatKind::Human => "human",
        }
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeatKind {
    type Err = UnknownBot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("human") {
            return Ok(SeatKind::Human);
        }
        s.parse().map(SeatKind::Bot)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("{policy} at seat {seat} made an illegal move: {reason}")]
    PolicyViolation {
        seat: usize,
        policy: String,
        reason: String,
    },
    #[error("seat {0} is waiting for a human decision")]
    HumanTurn(usize),
    #[error("seat {0} is not controlled by a human")]
    NotHuman(usize),
    #[error("cannot run a table with human seats to completion")]
    HumanSeat,
    #[error("game stalled after {0} plays")]
    Stalled(usize),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

enum Seat {
    Bot(Box<dyn BotPolicy>),
    Human,
}

/// Runs one game. The generator seeded from `seed` shuffles the deck and is
/// then handed to every bot decision in order, so the whole event log is a
/// function of the seed and the seat list.
pub struct Table {
    engine: Engine,
    seats: Vec<Seat>,
    kinds: Vec<SeatKind>,
    rng: GameRng,
    seed: u64,
    max_plays: usize,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("seed", &self.seed)
            .field("seats", &self.kinds)
            .field("phase", &self.engine.phase())
            .finish()
    }
}

impl Table {
    pub fn new(seed: u64, kinds: &[SeatKind]) -> Result<Self, TableError> {
        let mut rng = seeded_rng(seed);
        let engine = Engine::with_rng(&mut rng, kinds.len())?;
        let seats = kinds
            .iter()
            .map(|kind| match kind {
                SeatKind::Bot(bot) => Seat::Bot(create_bot(*bot)),
                SeatKind::Human => Seat::Human,
            })
            .collect();
        tracing::debug!(seed, seats = kinds.len(), "table created");
        Ok(Self {
            engine,
            seats,
            kinds: kinds.to_vec(),
            rng,
            seed,
            max_plays: DEFAULT_MAX_PLAYS,
        })
    }

    pub fn with_max_plays(mut self, max_plays: usize) -> Self {
        self.max_plays = max_plays;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn seat_kinds(&self) -> &[SeatKind] {
        &self.kinds
    }

    /// `random`, `heuristic` or `human` per seat.
    pub fn labels(&self) -> Vec<String> {
        self.kinds.iter().map(|k| k.label().to_string()).collect()
    }

    /// True when the engine is waiting on a human seat.
    pub fn awaiting_human(&self) -> bool {
        self.engine
            .current_player()
            .is_some_and(|seat| matches!(self.seats[seat], Seat::Human))
    }

    /// Let the bot whose turn it is make one decision. Returns no events once
    /// the game is over.
    pub fn step(&mut self) -> Result<Vec<Event>, TableError> {
        let Some(decision) = self.engine.pending_decision() else {
            return Ok(Vec::new());
        };
        let seat = decision.player;
        let Seat::Bot(policy) = &self.seats[seat] else {
            return Err(TableError::HumanTurn(seat));
        };
        if self.engine.state().turn_count() >= self.max_plays {
            tracing::warn!(seed = self.seed, plays = self.max_plays, "game stalled");
            return Err(TableError::Stalled(self.max_plays));
        }

        let view = self.engine.view_for(seat);
        let violation = |reason: String| TableError::PolicyViolation {
            seat,
            policy: policy.name().to_string(),
            reason,
        };
        let result = match decision.kind {
            ActionKind::SelectRank => {
                let rank = policy.select_rank(&view, &mut self.rng);
                tracing::trace!(seat, %rank, "bot selects rank");
                self.engine.select_rank(seat, rank)
            }
            ActionKind::Play => {
                let play = policy.choose_play(&view, &mut self.rng);
                if Some(play.claim_rank) != view.active_rank {
                    return Err(violation(format!(
                        "claimed {} while the active rank is {:?}",
                        play.claim_rank, view.active_rank
                    )));
                }
                tracing::trace!(seat, cards = play.cards.len(), "bot plays");
                self.engine.play(seat, &play.cards)
            }
            ActionKind::Challenge => {
                let choice = policy.decide_challenge(&view, &mut self.rng);
                let mut events = Vec::new();
                if let Some(eval) = choice.evaluation.clone() {
                    let noted = self
                        .engine
                        .annotate_challenge(seat, choice.message(), Some(eval))
                        .map_err(|e| violation(e.to_string()))?;
                    events.extend(noted);
                }
                tracing::trace!(seat, challenge = choice.challenge, "bot answers claim");
                self.engine
                    .decide_challenge(seat, choice.challenge)
                    .map(|more| {
                        events.extend(more);
                        events
                    })
            }
        };
        result.map_err(|e| {
            tracing::error!(seat, error = %e, "bot action rejected");
            violation(e.to_string())
        })
    }

    /// Step bots until a human must act or the game ends.
    pub fn run_until_human(&mut self) -> Result<Vec<Event>, TableError> {
        let mut events = Vec::new();
        while !self.engine.is_game_over() && !self.awaiting_human() {
            events.extend(self.step()?);
        }
        Ok(events)
    }

    /// Play an all-bot game to the end.
    pub fn run_to_completion(&mut self) -> Result<(), TableError> {
        if self.seats.iter().any(|s| matches!(s, Seat::Human)) {
            return Err(TableError::HumanSeat);
        }
        self.run_until_human()?;
        tracing::debug!(
            seed = self.seed,
            plays = self.engine.state().turn_count(),
            placements = ?self.engine.placements(),
            "game finished"
        );
        Ok(())
    }

    /// Submit a human decision. Engine rejections come back as
    /// [`TableError::Game`] with the state unchanged.
    pub fn apply_human(&mut self, seat: usize, action: Action) -> Result<Vec<Event>, TableError> {
        match self.seats.get(seat) {
            Some(Seat::Human) => Ok(self.engine.apply(seat, action)?),
            Some(Seat::Bot(_)) => Err(TableError::NotHuman(seat)),
            None => Err(TableError::Game(GameError::NotYourTurn {
                expected: self.engine.current_player().unwrap_or(0),
                actual: seat,
            })),
        }
    }

    pub fn replay(&self) -> Result<Replay, TableError> {
        Ok(Replay::record(&self.engine, self.seed, self.labels())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liar_engine::cards::Rank;

    #[test]
    fn seat_kinds_parse() {
        assert_eq!("human".parse::<SeatKind>(), Ok(SeatKind::Human));
        assert_eq!(
            "heuristic".parse::<SeatKind>(),
            Ok(SeatKind::Bot(BotKind::Heuristic))
        );
        assert!("nobody".parse::<SeatKind>().is_err());
    }

    #[test]
    fn rejects_bad_table_sizes() {
        let err = Table::new(1, &[SeatKind::Human]).unwrap_err();
        assert!(matches!(err, TableError::Game(GameError::InvalidPlayerCount(1))));
    }

    #[test]
    fn stops_at_human_seat() {
        let kinds = [
            SeatKind::Bot(BotKind::Random),
            SeatKind::Human,
            SeatKind::Bot(BotKind::Heuristic),
        ];
        let mut table = Table::new(5, &kinds).unwrap();
        table.run_until_human().unwrap();
        assert!(table.engine().is_game_over() || table.awaiting_human());
        if table.awaiting_human() {
            assert_eq!(table.engine().current_player(), Some(1));
            assert!(matches!(table.step(), Err(TableError::HumanTurn(1))));
        }
    }

    #[test]
    fn human_actions_go_through_engine_validation() {
        let kinds = [SeatKind::Human, SeatKind::Bot(BotKind::Random)];
        let mut table = Table::new(9, &kinds).unwrap();
        assert!(table.awaiting_human());
        let err = table
            .apply_human(0, Action::Play { cards: vec![] })
            .unwrap_err();
        assert!(matches!(err, TableError::Game(GameError::WrongPhase { .. })));
        assert!(matches!(
            table.apply_human(1, Action::SelectRank { rank: Rank::Two }),
            Err(TableError::NotHuman(1))
        ));
        let events = table
            .apply_human(0, Action::SelectRank { rank: Rank::Ace })
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn human_tables_cannot_autoplay() {
        let kinds = [SeatKind::Human, SeatKind::Bot(BotKind::Random)];
        let mut table = Table::new(9, &kinds).unwrap();
        assert!(matches!(table.run_to_completion(), Err(TableError::HumanSeat)));
    }

    #[test]
    fn stall_guard_trips() {
        let kinds = [SeatKind::Bot(BotKind::Random), SeatKind::Bot(BotKind::Random)];
        let mut table = Table::new(4, &kinds).unwrap().with_max_plays(0);
        assert!(matches!(table.step(), Err(TableError::Stalled(0))));
    }
}
