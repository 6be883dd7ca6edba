use thiserror::Error;

use crate::cards::Card;
use crate::game::ActionKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotYourTurn { expected: usize, actual: usize },
    #[error("Cannot {actual} now; expected the current player to {expected}")]
    WrongPhase {
        expected: ActionKind,
        actual: ActionKind,
    },
    #[error("A play must contain 1 to 3 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("Card {0} is not in the player's hand")]
    CardNotInHand(Card),
    #[error("The game is already over")]
    GameAlreadyOver,
    #[error("Player count must be between 2 and 6, got {0}")]
    InvalidPlayerCount(usize),
}

impl GameError {
    /// Stable machine-readable code, used by the session API.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NotYourTurn { .. } => "not_your_turn",
            GameError::WrongPhase { .. } => "wrong_phase",
            GameError::InvalidCardCount(_) => "invalid_card_count",
            GameError::CardNotInHand(_) => "card_not_in_hand",
            GameError::GameAlreadyOver => "game_already_over",
            GameError::InvalidPlayerCount(_) => "invalid_player_count",
        }
    }
}
