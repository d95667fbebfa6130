use crate::board::{Board, Side};
use crate::boards::fightopia::action::Action;
use crate::boards::fightopia::piece::{Orientation, Piece, PieceId, PieceKind};
use crate::boards::fightopia::{CELLS, COLS, INITIAL_LAYOUT, ROWS, goal_row};
use crate::error::{GameError, Result};
use log::trace;
use std::collections::BTreeMap;

type Occupancy = [Option<PieceId>; CELLS];

/// A Fightopia position.
///
/// The piece map is the source of truth. The occupancy grid is derived from it and rebuilt
/// after every change. Cloning is a deep copy: pieces are plain values keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    side_to_move: Side,
    pieces: BTreeMap<PieceId, Piece>,
    occupancy: Occupancy,
    next_id: u16,
}

impl Default for State {
    /// The starting position.
    fn default() -> Self {
        State::initial()
    }
}

impl State {
    /// An empty board with `side_to_move` to play.
    pub fn empty(side_to_move: Side) -> Self {
        Self {
            side_to_move,
            pieces: BTreeMap::new(),
            occupancy: [None; CELLS],
            next_id: 0,
        }
    }

    /// The starting position, first side to move.
    pub fn initial() -> Self {
        match State::from_layout(&INITIAL_LAYOUT, Side::First) {
            Ok(state) => state,
            Err(e) => unreachable!("initial layout is valid: {e}"),
        }
    }

    /// Builds a position from rows of glyphs (see [`INITIAL_LAYOUT`]). Rows may be shorter
    /// than the board; missing cells are empty. Tanks are placed vertically.
    pub fn from_layout(rows: &[&str], side_to_move: Side) -> Result<Self> {
        if rows.len() > ROWS as usize {
            return Err(GameError::invalid_layout(format!(
                "{} rows given, the board has {ROWS}",
                rows.len()
            )));
        }

        let mut state = State::empty(side_to_move);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() > COLS as usize {
                return Err(GameError::invalid_layout(format!(
                    "row {y} is wider than {COLS} cells"
                )));
            }

            for (x, glyph) in row.chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let (kind, side) = parse_glyph(glyph).ok_or_else(|| {
                    GameError::invalid_layout(format!("unknown glyph '{glyph}' at [{x},{y}]"))
                })?;
                state.place(kind, side, x as i32, y as i32, Orientation::Vertical)?;
            }
        }

        Ok(state)
    }

    /// Puts a new piece on the board and returns its id. The whole footprint must be in bounds
    /// and free.
    pub fn place(
        &mut self,
        kind: PieceKind,
        side: Side,
        x: i32,
        y: i32,
        orientation: Orientation,
    ) -> Result<PieceId> {
        let piece = Piece {
            id: PieceId(self.next_id),
            kind,
            side,
            x,
            y,
            orientation,
        };

        for (cx, cy) in piece.cells() {
            if !self.is_valid_position(cx, cy) {
                return Err(GameError::invalid_layout(format!(
                    "{kind} at [{x},{y}] leaves the board"
                )));
            }
            if let Some(other) = self.occupant(cx, cy) {
                return Err(GameError::invalid_layout(format!(
                    "{kind} at [{x},{y}] overlaps piece {other} at [{cx},{cy}]"
                )));
            }
        }

        self.next_id += 1;
        self.pieces.insert(piece.id, piece);
        self.recalc_occupancy();
        Ok(piece.id)
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Live pieces in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        (0..COLS).contains(&x) && (0..ROWS).contains(&y)
    }

    /// Id of the piece covering `(x, y)`, if any. Out-of-bounds cells are empty.
    pub fn occupant(&self, x: i32, y: i32) -> Option<PieceId> {
        cell_index(x, y).and_then(|index| self.occupancy[index])
    }

    /// The piece covering `(x, y)`, if any.
    pub fn piece_at(&self, x: i32, y: i32) -> Option<&Piece> {
        self.occupant(x, y).and_then(|id| self.pieces.get(&id))
    }

    /// All actions available to `side`, piece by piece in id order.
    pub fn legal_actions(&self, side: Side) -> Vec<Action> {
        self.pieces
            .values()
            .filter(|piece| piece.side == side)
            .flat_map(|piece| piece.legal_actions(self))
            .collect()
    }

    /// Actions available to a single piece.
    pub fn piece_actions(&self, id: PieceId) -> Result<Vec<Action>> {
        let piece = self
            .piece(id)
            .ok_or_else(|| GameError::invalid_action(format!("no piece {id} on the board")))?;
        Ok(piece.legal_actions(self))
    }

    /// Applies `action` in place and hands the turn to the other side.
    ///
    /// The action is checked against this state before anything changes, so a rejected action
    /// leaves the state untouched.
    pub fn apply(&mut self, action: &Action) -> Result<()> {
        if let Some(winner) = self.terminal_outcome() {
            return Err(GameError::GameOver { winner });
        }

        let piece = *self.piece(action.piece()).ok_or_else(|| {
            GameError::invalid_action(format!("{action}: piece {} is gone", action.piece()))
        })?;
        if piece.side != self.side_to_move {
            return Err(GameError::invalid_action(format!(
                "{action}: it is {} side's turn",
                self.side_to_move
            )));
        }
        if !piece.legal_actions(self).contains(action) {
            trace!("rejected {action} for {} {}", piece.kind, piece.id);
            return Err(GameError::invalid_action(format!(
                "{action} is not legal in this position"
            )));
        }

        match *action {
            Action::Move { piece, x, y } => {
                if let Some(moved) = self.pieces.get_mut(&piece) {
                    moved.x = x;
                    moved.y = y;
                }
            }
            Action::Pivot {
                piece,
                x,
                y,
                orientation,
            } => {
                if let Some(pivoted) = self.pieces.get_mut(&piece) {
                    pivoted.x = x;
                    pivoted.y = y;
                    pivoted.orientation = orientation;
                }
            }
            Action::Shoot { target, .. } => {
                self.pieces.remove(&target);
            }
        }

        self.side_to_move = self.side_to_move.opposite();
        self.recalc_occupancy();
        Ok(())
    }

    /// A copy of this state with `action` applied.
    pub fn applied(&self, action: &Action) -> Result<State> {
        let mut next = self.clone();
        next.apply(action)?;
        Ok(next)
    }

    /// The winner, if the game is decided.
    ///
    /// A side without tanks loses regardless of where the giants stand. Otherwise a giant
    /// standing on its goal row wins.
    pub fn terminal_outcome(&self) -> Option<Side> {
        for side in Side::ALL {
            if self.count(side, PieceKind::Tank) == 0 {
                return Some(side.opposite());
            }
        }

        self.pieces
            .values()
            .find(|piece| piece.kind == PieceKind::Giant && piece.y == goal_row(piece.side))
            .map(|giant| giant.side)
    }

    /// Material heuristic for `side`: giant 100, tank 10, pawn 1. A giant on its goal row
    /// scores 1000, no tanks left scores 0.
    pub fn score(&self, side: Side) -> u32 {
        if self.count(side, PieceKind::Tank) == 0 {
            return 0;
        }

        let mut score = 0;
        for piece in self.pieces.values().filter(|piece| piece.side == side) {
            score += match piece.kind {
                PieceKind::Giant if piece.y == goal_row(side) => return 1000,
                PieceKind::Giant => 100,
                PieceKind::Tank => 10,
                PieceKind::Pawn => 1,
            };
        }
        score
    }

    fn count(&self, side: Side, kind: PieceKind) -> usize {
        self.pieces
            .values()
            .filter(|piece| piece.side == side && piece.kind == kind)
            .count()
    }

    fn recalc_occupancy(&mut self) {
        self.occupancy = derive_occupancy(&self.pieces);
    }
}

impl Board for State {
    type Move = Action;

    fn current_side(&self) -> Side {
        self.side_to_move
    }

    fn winner(&self) -> Option<Side> {
        self.terminal_outcome()
    }

    fn available_moves(&self) -> Vec<Action> {
        if self.terminal_outcome().is_some() {
            return Vec::new();
        }
        self.legal_actions(self.side_to_move)
    }

    fn perform_move(&mut self, b_move: &Action) -> Result<()> {
        self.apply(b_move)
    }
}

fn cell_index(x: i32, y: i32) -> Option<usize> {
    if (0..COLS).contains(&x) && (0..ROWS).contains(&y) {
        Some((y * COLS + x) as usize)
    } else {
        None
    }
}

fn derive_occupancy(pieces: &BTreeMap<PieceId, Piece>) -> Occupancy {
    let mut occupancy = [None; CELLS];
    for piece in pieces.values() {
        for (x, y) in piece.cells() {
            if let Some(index) = cell_index(x, y) {
                debug_assert!(occupancy[index].is_none(), "pieces overlap at [{x},{y}]");
                occupancy[index] = Some(piece.id);
            }
        }
    }
    occupancy
}

fn parse_glyph(glyph: char) -> Option<(PieceKind, Side)> {
    let kind = match glyph.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        't' => PieceKind::Tank,
        'g' => PieceKind::Giant,
        _ => return None,
    };
    let side = if glyph.is_ascii_lowercase() {
        Side::First
    } else {
        Side::Second
    };
    Some((kind, side))
}
