use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Inputs and outputs of the heuristic challenge model, attached to the log
/// so a replay can show why a bot challenged or passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeEvaluation {
    /// Estimated probability that the claim is truthful
    pub p_truthful: f64,
    /// Expected value of challenging
    pub u_challenge: f64,
    /// Expected value of passing
    pub u_pass: f64,
    /// Pile size at decision time
    pub pile: usize,
    /// Number of cards claimed
    pub k: usize,
    /// Cards of the claimed rank in the evaluator's own hand
    pub my_active: usize,
    /// Claimant's hand size before the play
    pub opp_hand: usize,
}

/// One entry of the append-only game log. Every state change the engine
/// makes is described by exactly one of these, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    GameStart,
    SelectRank {
        player: usize,
        rank: Rank,
    },
    Play {
        player: usize,
        cards: Vec<Card>,
        claim_rank: Rank,
    },
    ChallengeDecision {
        challenger: usize,
        challenge: bool,
    },
    ChallengeEval {
        challenger: usize,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        eval: Option<ChallengeEvaluation>,
    },
    ChallengeResolution {
        challenger: usize,
        truthful: bool,
        revealed: Vec<Card>,
    },
    PickupPile {
        player: usize,
        cards: Vec<Card>,
    },
    DiscardQuad {
        player: usize,
        rank: Rank,
        cards: Vec<Card>,
    },
    Placement {
        player: usize,
        place: usize,
    },
    GameEnd {
        placements: Vec<usize>,
    },
}

impl Event {
    /// Wire name of the variant (`"PICKUP_PILE"` etc.).
    pub fn kind(&self) -> &'static str {
        match self {
            Event::GameStart => "GAME_START",
            Event::SelectRank { .. } => "SELECT_RANK",
            Event::Play { .. } => "PLAY",
            Event::ChallengeDecision { .. } => "CHALLENGE_DECISION",
            Event::ChallengeEval { .. } => "CHALLENGE_EVAL",
            Event::ChallengeResolution { .. } => "CHALLENGE_RESOLUTION",
            Event::PickupPile { .. } => "PICKUP_PILE",
            Event::DiscardQuad { .. } => "DISCARD_QUAD",
            Event::Placement { .. } => "PLACEMENT",
            Event::GameEnd { .. } => "GAME_END",
        }
    }
}
