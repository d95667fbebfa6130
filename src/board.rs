use crate::error::Result;
use std::fmt::{Debug, Display, Formatter};

/// The central trait of the library, defining the interface for a game state.
///
/// The search engine only ever talks to a game through this trait: it clones states,
/// enumerates the moves of the side to move, applies them, and asks for the winner.
pub trait Board: Clone {
    /// The type representing a move in the game. Moves must stay meaningful when applied to a
    /// clone of the state they were generated from.
    type Move: Clone + Debug;

    /// Returns the side whose turn it is to make a move.
    fn current_side(&self) -> Side;

    /// Returns the winning side, or `None` while the game is undecided.
    fn winner(&self) -> Option<Side>;

    /// Returns a list of all legal moves for the side to move.
    /// A decided game has no moves.
    fn available_moves(&self) -> Vec<Self::Move>;

    /// Applies a given move to the board, modifying its state.
    fn perform_move(&mut self, b_move: &Self::Move) -> Result<()>;
}

/// One of the two sides of a game. `First` always moves first.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::First, Side::Second];

    pub fn opposite(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// Represents the players in the game from the perspective of the MCTS search.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Player {
    /// The player for whom the MCTS is currently searching for the best move.
    Me,
    /// The opponent.
    Other,
}

impl Player {
    /// Maps an absolute side onto the perspective of `actor`.
    pub fn of(side: Side, actor: Side) -> Self {
        if side == actor {
            Player::Me
        } else {
            Player::Other
        }
    }
}

/// Represents the possible outcomes of a game, seen from the actor's side.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The actor has won.
    Win,
    /// The actor has lost.
    Lose,
}

impl GameOutcome {
    pub fn from_winner(winner: Option<Side>, actor: Side) -> Self {
        match winner {
            None => GameOutcome::InProgress,
            Some(side) if side == actor => GameOutcome::Win,
            Some(_) => GameOutcome::Lose,
        }
    }
}
