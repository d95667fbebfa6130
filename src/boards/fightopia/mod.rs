//! Fightopia, a two-player game on an 8x8 board.
//!
//! Each side owns pawns (1x1), tanks (1x2 or 2x1) and a giant (2x2). Pawns step in any
//! direction. Tanks slide along their axis, pivot, and shoot the first enemy pawn in line.
//! Giants step in any direction and shoot enemy tanks touching their block.
//!
//! A side wins when the opponent has no tanks left, or when its giant reaches the far edge.

/// The action value objects.
pub mod action;
/// Piece kinds, footprints and per-kind move generation.
pub mod piece;
/// The game state: pieces, occupancy, turn order and win detection.
pub mod state;

pub use crate::board::Side;
pub use action::Action;
pub use piece::{Orientation, Piece, PieceId, PieceKind};
pub use state::State;

pub const COLS: i32 = 8;
pub const ROWS: i32 = 8;
pub const CELLS: usize = (COLS * ROWS) as usize;

/// Height of the giant's block.
pub const GIANT_HEIGHT: i32 = 2;

/// Row the first side's giant anchor must reach. It starts at the top and walks down.
pub const FIRST_GOAL_ROW: i32 = ROWS - GIANT_HEIGHT;
/// Row the second side's giant anchor must reach. It starts at the bottom and walks up.
pub const SECOND_GOAL_ROW: i32 = 0;

pub const fn goal_row(side: Side) -> i32 {
    match side {
        Side::First => FIRST_GOAL_ROW,
        Side::Second => SECOND_GOAL_ROW,
    }
}

/// Starting position, row 0 first. Lowercase belongs to the first side, uppercase to the
/// second. `t`, `p` and `g` mark the anchor of a tank (vertical), pawn and giant.
pub const INITIAL_LAYOUT: [&str; 8] = [
    "tppg ppt",
    "  p  p  ",
    "  pppp  ",
    "        ",
    "        ",
    "  PPPP  ",
    "T PG P T",
    " PP  PP ",
];
