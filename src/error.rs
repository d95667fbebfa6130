//! Error types for the game engine and the search.
//!
//! Every rejection is reported to the caller; none of them leaves a state half-updated.

use crate::board::Side;
use thiserror::Error;

/// Errors that can occur while setting up, playing or searching a game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The referenced piece or target is gone, belongs to the wrong side, or the action is
    /// not legal against the current state. Re-enumerate and retry.
    #[error("Invalid action: {reason}")]
    InvalidAction { reason: String },

    /// An action was applied after the game had already been decided.
    #[error("Game is over, {winner} side has won")]
    GameOver { winner: Side },

    /// The side has nothing it can legally do.
    #[error("No legal action for {side} side")]
    NoLegalAction { side: Side },

    /// A starting position could not be built.
    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },
}

impl GameError {
    pub(crate) fn invalid_action(reason: impl Into<String>) -> Self {
        GameError::InvalidAction {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_layout(reason: impl Into<String>) -> Self {
        GameError::InvalidLayout {
            reason: reason.into(),
        }
    }
}

/// Result type alias for game and search operations
pub type Result<T> = std::result::Result<T, GameError>;
