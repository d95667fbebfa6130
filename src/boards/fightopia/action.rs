use crate::boards::fightopia::piece::{Orientation, PieceId};
use std::fmt::{Display, Formatter};

/// Something a piece can do on its side's turn.
///
/// Actions name pieces by id only, so an action generated against one state can be applied to
/// any clone of it. All validation happens in [`State::apply`](super::State::apply).
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Action {
    /// Re-anchor `piece` at `(x, y)`, keeping its orientation.
    Move { piece: PieceId, x: i32, y: i32 },
    /// Re-anchor a tank at `(x, y)` with the new `orientation`.
    Pivot {
        piece: PieceId,
        x: i32,
        y: i32,
        orientation: Orientation,
    },
    /// Remove `target` from the board.
    Shoot { piece: PieceId, target: PieceId },
}

impl Action {
    /// The acting piece.
    pub fn piece(&self) -> PieceId {
        match *self {
            Action::Move { piece, .. }
            | Action::Pivot { piece, .. }
            | Action::Shoot { piece, .. } => piece,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { piece, x, y } => write!(f, "move {piece} to [{x},{y}]"),
            Action::Pivot {
                piece,
                x,
                y,
                orientation,
            } => write!(f, "pivot {piece} to [{x},{y}] {orientation}"),
            Action::Shoot { piece, target } => write!(f, "shoot {piece} at {target}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acting_piece_is_reported_for_every_variant() {
        let moved = Action::Move {
            piece: PieceId(3),
            x: 1,
            y: 2,
        };
        let pivoted = Action::Pivot {
            piece: PieceId(4),
            x: 0,
            y: 0,
            orientation: Orientation::Horizontal,
        };
        let shot = Action::Shoot {
            piece: PieceId(5),
            target: PieceId(9),
        };

        assert_eq!(moved.piece(), PieceId(3));
        assert_eq!(pivoted.piece(), PieceId(4));
        assert_eq!(shot.piece(), PieceId(5));
    }

    #[test]
    fn display() {
        let pivoted = Action::Pivot {
            piece: PieceId(4),
            x: 0,
            y: 1,
            orientation: Orientation::Horizontal,
        };
        let shot = Action::Shoot {
            piece: PieceId(5),
            target: PieceId(9),
        };

        assert_eq!(pivoted.to_string(), "pivot #4 to [0,1] horizontal");
        assert_eq!(shot.to_string(), "shoot #5 at #9");
    }
}
