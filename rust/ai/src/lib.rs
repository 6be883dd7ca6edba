//! # liar-ai: Bot Policies for Lying/Cheat
//!
//! Provides the automated players for the Lying/Cheat engine, plus the table
//! driver that seats them (and optionally humans) around one engine.
//!
//! ## Core Components
//!
//! - [`BotPolicy`] - Trait defining the three decisions a seat makes
//! - [`random`] - Uniformly random legal play, for baselines and fuzzing
//! - [`heuristic`] - Card-counting policy with an explicit challenge model
//! - [`create_bot`] - Factory function for creating policies by [`BotKind`]
//! - [`table`] - Runs a game: seeds the RNG, asks policies, feeds the engine
//!
//! ## Quick Start
//!
//! ```rust
//! use liar_ai::table::{SeatKind, Table};
//! use liar_ai::BotKind;
//!
//! let seats = [
//!     SeatKind::Bot(BotKind::Heuristic),
//!     SeatKind::Bot(BotKind::Random),
//!     SeatKind::Bot(BotKind::Heuristic),
//! ];
//! let mut table = Table::new(42, &seats).expect("valid table");
//! table.run_to_completion().expect("bots only play legal moves");
//! assert!(table.engine().is_game_over());
//! assert_eq!(table.engine().placements().len(), 3);
//! ```
//!
//! ## Bot Types
//!
//! - `"random"` - uniform over legal options
//! - `"heuristic"` - hypergeometric truth estimate, utility comparison for challenges

use std::fmt;
use std::str::FromStr;

use liar_engine::cards::{Card, Rank};
use liar_engine::deck::GameRng;
use liar_engine::events::ChallengeEvaluation;
use liar_engine::game::PlayerView;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod heuristic;
pub mod random;
pub mod table;

/// Cards to place and the rank they are claimed to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayDecision {
    pub cards: Vec<Card>,
    pub claim_rank: Rank,
}

/// Whether to call the current claim, with the numbers behind the choice
/// when the policy computes any.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeDecision {
    pub challenge: bool,
    pub evaluation: Option<ChallengeEvaluation>,
}

impl ChallengeDecision {
    pub fn plain(challenge: bool) -> Self {
        Self {
            challenge,
            evaluation: None,
        }
    }

    /// One-line explanation for the event log.
    pub fn message(&self) -> String {
        let verdict = if self.challenge { "challenge" } else { "pass" };
        match &self.evaluation {
            Some(e) => format!(
                "p_truthful={:.3} u_challenge={:.2} u_pass={:.2} -> {}",
                e.p_truthful, e.u_challenge, e.u_pass, verdict
            ),
            None => verdict.to_string(),
        }
    }
}

/// Trait defining the interface for automated seats.
///
/// Every method receives an owned [`PlayerView`] snapshot (the seat's own
/// hand plus public information) and the game's single seeded generator, so
/// a run is reproducible from its seed. A policy must only return legal
/// decisions; the table driver treats anything the engine rejects as fatal.
///
/// # Example Implementation
///
/// ```rust
/// use liar_ai::{BotPolicy, ChallengeDecision, PlayDecision};
/// use liar_engine::cards::Rank;
/// use liar_engine::deck::GameRng;
/// use liar_engine::game::PlayerView;
///
/// struct AlwaysTwos;
///
/// impl BotPolicy for AlwaysTwos {
///     fn select_rank(&self, _view: &PlayerView, _rng: &mut GameRng) -> Rank {
///         Rank::Two
///     }
///
///     fn choose_play(&self, view: &PlayerView, _rng: &mut GameRng) -> PlayDecision {
///         PlayDecision {
///             cards: vec![view.hand[0]],
///             claim_rank: view.active_rank.unwrap_or(Rank::Two),
///         }
///     }
///
///     fn decide_challenge(&self, _view: &PlayerView, _rng: &mut GameRng) -> ChallengeDecision {
///         ChallengeDecision::plain(false)
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysTwos"
///     }
/// }
/// ```
pub trait BotPolicy: Send + Sync {
    /// Choose the rank that opens a new run.
    fn select_rank(&self, view: &PlayerView, rng: &mut GameRng) -> Rank;

    /// Choose 1-3 cards from the hand. `claim_rank` must equal the active rank.
    fn choose_play(&self, view: &PlayerView, rng: &mut GameRng) -> PlayDecision;

    /// Decide whether to challenge the claim in `view.claim`.
    fn decide_challenge(&self, view: &PlayerView, rng: &mut GameRng) -> ChallengeDecision;

    /// Return the name/identifier of this policy.
    fn name(&self) -> &str;
}

/// Built-in policy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    Random,
    Heuristic,
}

impl BotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BotKind::Random => "random",
            BotKind::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown bot type '{0}' (expected random or heuristic)")]
pub struct UnknownBot(pub String);

impl FromStr for BotKind {
    type Err = UnknownBot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(BotKind::Random),
            "heuristic" => Ok(BotKind::Heuristic),
            _ => Err(UnknownBot(s.to_string())),
        }
    }
}

/// Factory function to create a policy by kind.
///
/// ```rust
/// use liar_ai::{create_bot, BotKind};
///
/// let bot = create_bot(BotKind::Heuristic);
/// assert_eq!(bot.name(), "HeuristicBot");
/// ```
pub fn create_bot(kind: BotKind) -> Box<dyn BotPolicy> {
    match kind {
        BotKind::Random => Box::new(random::RandomBot::new()),
        BotKind::Heuristic => Box::new(heuristic::HeuristicBot::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_kind_parses_case_insensitively() {
        assert_eq!("Random".parse::<BotKind>(), Ok(BotKind::Random));
        assert_eq!(" heuristic ".parse::<BotKind>(), Ok(BotKind::Heuristic));
        assert_eq!(
            "smart".parse::<BotKind>(),
            Err(UnknownBot("smart".to_string()))
        );
    }

    #[test]
    fn factory_names_match_kinds() {
        assert_eq!(create_bot(BotKind::Random).name(), "RandomBot");
        assert_eq!(create_bot(BotKind::Heuristic).name(), "HeuristicBot");
    }

    #[test]
    fn message_includes_numbers_when_evaluated() {
        let decision = ChallengeDecision {
            challenge: true,
            evaluation: Some(ChallengeEvaluation {
                p_truthful: 0.25,
                u_challenge: 3.0,
                u_pass: 0.4,
                pile: 6,
                k: 2,
                my_active: 1,
                opp_hand: 7,
            }),
        };
        assert_eq!(
            decision.message(),
            "p_truthful=0.250 u_challenge=3.00 u_pass=0.40 -> challenge"
        );
        assert_eq!(ChallengeDecision::plain(false).message(), "pass");
    }
}
