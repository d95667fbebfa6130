use crate::board::Side;
use crate::boards::fightopia::action::Action;
use crate::boards::fightopia::state::State;
use std::fmt::{Display, Formatter};

/// Stable identity of a piece. Assigned once when the piece is placed and shared by every
/// clone of the state, so actions can be replayed against copies.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub struct PieceId(pub u16);

impl Display for PieceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum PieceKind {
    /// One cell. Moves one step in any direction and never shoots.
    Pawn,
    /// Two cells along its orientation. Slides, pivots and shoots pawns.
    Tank,
    /// A 2x2 block. Steps in any direction and shoots adjacent tanks.
    Giant,
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Tank => write!(f, "tank"),
            PieceKind::Giant => write!(f, "giant"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Unit step along the long axis.
    pub fn axis(self) -> (i32, i32) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

const SINGLE_CELL: [(i32, i32); 1] = [(0, 0)];
const HORIZONTAL_DOMINO: [(i32, i32); 2] = [(0, 0), (1, 0)];
const VERTICAL_DOMINO: [(i32, i32); 2] = [(0, 0), (0, 1)];
const BLOCK: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Clockwise from north.
const NEIGHBOURS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const TANK_SLIDES: [i32; 4] = [-2, -1, 1, 2];

/// Cells around a giant's block that a domino touching the giant can cover.
const GIANT_PERIMETER: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, -1),
    (1, -1),
    (2, 0),
    (2, 1),
    (0, 2),
    (1, 2),
];

/// Footprint offsets of a piece relative to its anchor (top-left cell).
/// The orientation only matters for tanks.
pub fn footprint(kind: PieceKind, orientation: Orientation) -> &'static [(i32, i32)] {
    match (kind, orientation) {
        (PieceKind::Pawn, _) => &SINGLE_CELL,
        (PieceKind::Tank, Orientation::Horizontal) => &HORIZONTAL_DOMINO,
        (PieceKind::Tank, Orientation::Vertical) => &VERTICAL_DOMINO,
        (PieceKind::Giant, _) => &BLOCK,
    }
}

/// A piece on the board, anchored at its top-left cell.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub side: Side,
    pub x: i32,
    pub y: i32,
    /// Meaningful only for tanks.
    pub orientation: Orientation,
}

impl Piece {
    /// Cells currently covered by this piece.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        self.cells_at(self.x, self.y, self.orientation)
    }

    /// Cells this piece would cover if anchored at `(x, y)` with `orientation`.
    pub fn cells_at(
        &self,
        x: i32,
        y: i32,
        orientation: Orientation,
    ) -> impl Iterator<Item = (i32, i32)> + use<> {
        footprint(self.kind, orientation)
            .iter()
            .map(move |&(dx, dy)| (x + dx, y + dy))
    }

    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.side != other.side
    }

    /// Every action this piece may take in `state`, in a fixed order.
    pub fn legal_actions(&self, state: &State) -> Vec<Action> {
        match self.kind {
            PieceKind::Pawn => self.pawn_actions(state),
            PieceKind::Tank => self.tank_actions(state),
            PieceKind::Giant => self.giant_actions(state),
        }
    }

    /// Whether the piece could stand at `(x, y)` with `orientation`: every cell in bounds and
    /// either empty or already covered by this piece.
    fn fits(&self, state: &State, x: i32, y: i32, orientation: Orientation) -> bool {
        self.cells_at(x, y, orientation).all(|(cx, cy)| {
            state.is_valid_position(cx, cy) && state.occupant(cx, cy).is_none_or(|id| id == self.id)
        })
    }

    fn pawn_actions(&self, state: &State) -> Vec<Action> {
        self.step_moves(state)
    }

    fn step_moves(&self, state: &State) -> Vec<Action> {
        NEIGHBOURS
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .filter(|&(x, y)| self.fits(state, x, y, self.orientation))
            .map(|(x, y)| Action::Move {
                piece: self.id,
                x,
                y,
            })
            .collect()
    }

    fn tank_actions(&self, state: &State) -> Vec<Action> {
        let mut actions = Vec::new();
        let (dx, dy) = self.orientation.axis();

        for step in TANK_SLIDES {
            let (x, y) = (self.x + dx * step, self.y + dy * step);
            if self.fits(state, x, y, self.orientation) {
                actions.push(Action::Move {
                    piece: self.id,
                    x,
                    y,
                });
            }
        }

        let pivoted = self.orientation.flipped();
        for (x, y) in self.pivot_anchors() {
            if self.fits(state, x, y, pivoted) {
                actions.push(Action::Pivot {
                    piece: self.id,
                    x,
                    y,
                    orientation: pivoted,
                });
            }
        }

        for (start, step) in self.firing_lines() {
            let Some(target) = first_piece_in_line(state, start, step) else {
                continue;
            };
            if target.kind == PieceKind::Pawn && self.is_enemy_of(target) {
                actions.push(Action::Shoot {
                    piece: self.id,
                    target: target.id,
                });
            }
        }

        actions
    }

    /// The four anchors of a rotated domino that still shares a cell with the current one.
    fn pivot_anchors(&self) -> [(i32, i32); 4] {
        let (x, y) = (self.x, self.y);
        match self.orientation {
            //  * x .    . * x    . . .    . . .
            //  . . .    . . .    * x .    . * x
            Orientation::Vertical => [(x - 1, y), (x, y), (x - 1, y + 1), (x, y + 1)],
            Orientation::Horizontal => [(x, y - 1), (x + 1, y - 1), (x, y), (x + 1, y)],
        }
    }

    /// First cell beyond each end of the tank, paired with the direction to keep scanning.
    fn firing_lines(&self) -> [((i32, i32), (i32, i32)); 2] {
        let (x, y) = (self.x, self.y);
        match self.orientation {
            Orientation::Vertical => [((x, y - 1), (0, -1)), ((x, y + 2), (0, 1))],
            Orientation::Horizontal => [((x - 1, y), (-1, 0)), ((x + 2, y), (1, 0))],
        }
    }

    fn giant_actions(&self, state: &State) -> Vec<Action> {
        let mut actions = self.step_moves(state);

        let mut targets = Vec::new();
        for (dx, dy) in GIANT_PERIMETER {
            let Some(target) = state.piece_at(self.x + dx, self.y + dy) else {
                continue;
            };
            if target.kind == PieceKind::Tank
                && self.is_enemy_of(target)
                && !targets.contains(&target.id)
            {
                targets.push(target.id);
            }
        }

        actions.extend(targets.into_iter().map(|target| Action::Shoot {
            piece: self.id,
            target,
        }));
        actions
    }
}

fn first_piece_in_line(state: &State, start: (i32, i32), step: (i32, i32)) -> Option<&Piece> {
    let (mut x, mut y) = start;
    while state.is_valid_position(x, y) {
        if let Some(piece) = state.piece_at(x, y) {
            return Some(piece);
        }
        x += step.0;
        y += step.1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shots(actions: &[Action]) -> Vec<PieceId> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Shoot { target, .. } => Some(*target),
                _ => None,
            })
            .collect()
    }

    fn moves(actions: &[Action]) -> Vec<(i32, i32)> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Move { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn footprints_follow_kind_and_orientation() {
        assert_eq!(footprint(PieceKind::Pawn, Orientation::Horizontal).len(), 1);
        assert_eq!(
            footprint(PieceKind::Tank, Orientation::Horizontal),
            &[(0, 0), (1, 0)]
        );
        assert_eq!(
            footprint(PieceKind::Tank, Orientation::Vertical),
            &[(0, 0), (0, 1)]
        );
        assert_eq!(footprint(PieceKind::Giant, Orientation::Vertical).len(), 4);
    }

    #[test]
    fn corner_tank_slides_only_inwards() {
        // arrange
        let state = State::initial();
        let tank = *state.piece_at(0, 0).unwrap();

        // act
        let actions = tank.legal_actions(&state);

        // assert
        assert_eq!(tank.kind, PieceKind::Tank);
        assert_eq!(tank.orientation, Orientation::Vertical);
        assert_eq!(moves(&actions), vec![(0, 1), (0, 2)]);
        assert!(actions.contains(&Action::Pivot {
            piece: tank.id,
            x: 0,
            y: 1,
            orientation: Orientation::Horizontal,
        }));
        assert!(shots(&actions).is_empty());
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn surrounded_pawn_is_stuck() {
        // arrange
        let mut state = State::empty(Side::First);
        let pawn = state
            .place(PieceKind::Pawn, Side::First, 3, 3, Orientation::Vertical)
            .unwrap();
        for (i, (dx, dy)) in NEIGHBOURS.iter().enumerate() {
            let side = if i % 2 == 0 {
                Side::First
            } else {
                Side::Second
            };
            state
                .place(PieceKind::Pawn, side, 3 + dx, 3 + dy, Orientation::Vertical)
                .unwrap();
        }

        // act
        let actions = state.piece_actions(pawn).unwrap();

        // assert
        assert!(actions.is_empty());
    }

    #[test]
    fn pawn_moves_to_free_neighbours_only() {
        let mut state = State::empty(Side::First);
        let pawn = state
            .place(PieceKind::Pawn, Side::First, 0, 0, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::Second, 1, 0, Orientation::Vertical)
            .unwrap();

        let actions = state.piece_actions(pawn).unwrap();

        assert_eq!(moves(&actions), vec![(1, 1), (0, 1)]);
    }

    #[test]
    fn tank_shoots_first_enemy_pawn_in_line() {
        // arrange
        let mut state = State::empty(Side::First);
        let tank = state
            .place(PieceKind::Tank, Side::First, 2, 2, Orientation::Vertical)
            .unwrap();
        let far_pawn = state
            .place(PieceKind::Pawn, Side::Second, 2, 6, Orientation::Vertical)
            .unwrap();
        let behind_enemy_tank = state
            .place(PieceKind::Pawn, Side::Second, 2, 0, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Tank, Side::Second, 1, 1, Orientation::Horizontal)
            .unwrap();

        // act
        let actions = state.piece_actions(tank).unwrap();

        // assert
        assert_eq!(shots(&actions), vec![far_pawn]);
        assert!(!shots(&actions).contains(&behind_enemy_tank));
    }

    #[test]
    fn tank_line_of_fire_is_blocked_by_friends() {
        let mut state = State::empty(Side::First);
        let tank = state
            .place(PieceKind::Tank, Side::First, 1, 3, Orientation::Horizontal)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::First, 5, 3, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::Second, 7, 3, Orientation::Vertical)
            .unwrap();
        let left = state
            .place(PieceKind::Pawn, Side::Second, 0, 3, Orientation::Vertical)
            .unwrap();

        let actions = state.piece_actions(tank).unwrap();

        assert_eq!(shots(&actions), vec![left]);
    }

    #[test]
    fn tank_never_shoots_friendly_pawns() {
        let mut state = State::empty(Side::First);
        let tank = state
            .place(PieceKind::Tank, Side::First, 4, 4, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::First, 4, 1, Orientation::Vertical)
            .unwrap();

        let actions = state.piece_actions(tank).unwrap();

        assert!(shots(&actions).is_empty());
    }

    #[test]
    fn horizontal_tank_pivots_into_vertical_anchors() {
        // arrange
        let mut state = State::empty(Side::First);
        let tank = state
            .place(PieceKind::Tank, Side::First, 3, 3, Orientation::Horizontal)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::Second, 4, 2, Orientation::Vertical)
            .unwrap();

        // act
        let pivots: Vec<(i32, i32)> = state
            .piece_actions(tank)
            .unwrap()
            .into_iter()
            .filter_map(|action| match action {
                Action::Pivot { x, y, orientation, .. } => {
                    assert_eq!(orientation, Orientation::Vertical);
                    Some((x, y))
                }
                _ => None,
            })
            .collect();

        // assert
        assert_eq!(pivots, vec![(3, 2), (3, 3), (4, 3)]);
    }

    #[test]
    fn tank_slides_stop_at_obstacles_and_edges() {
        let mut state = State::empty(Side::First);
        let tank = state
            .place(PieceKind::Tank, Side::First, 5, 0, Orientation::Horizontal)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::First, 3, 0, Orientation::Vertical)
            .unwrap();

        let actions = state.piece_actions(tank).unwrap();

        // 3 is blocked, 7 would leave the board
        assert_eq!(moves(&actions), vec![(4, 0), (6, 0)]);
    }

    #[test]
    fn giant_steps_need_the_whole_block_free() {
        let mut state = State::empty(Side::First);
        let giant = state
            .place(PieceKind::Giant, Side::First, 0, 0, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::Second, 2, 2, Orientation::Vertical)
            .unwrap();

        let actions = state.piece_actions(giant).unwrap();

        assert_eq!(moves(&actions), vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn giant_shoots_each_adjacent_enemy_tank_once() {
        // arrange
        let mut state = State::empty(Side::First);
        let giant = state
            .place(PieceKind::Giant, Side::First, 3, 3, Orientation::Vertical)
            .unwrap();
        let tank = state
            .place(PieceKind::Tank, Side::Second, 2, 3, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Pawn, Side::Second, 5, 3, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Tank, Side::First, 5, 4, Orientation::Vertical)
            .unwrap();

        // act
        let actions = state.piece_actions(giant).unwrap();

        // assert
        assert_eq!(shots(&actions), vec![tank]);
    }

    #[test]
    fn giant_ignores_diagonal_corners() {
        let mut state = State::empty(Side::First);
        let giant = state
            .place(PieceKind::Giant, Side::First, 3, 3, Orientation::Vertical)
            .unwrap();
        state
            .place(PieceKind::Tank, Side::Second, 5, 5, Orientation::Vertical)
            .unwrap();

        let actions = state.piece_actions(giant).unwrap();

        assert!(shots(&actions).is_empty());
    }
}
