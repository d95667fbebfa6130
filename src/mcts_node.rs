use crate::board::{Board, GameOutcome, Player, Side};

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node owns its own copy of the game state, the statistics gathered for it,
/// and the move that led to it.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Board> {
    /// The depth of the node in the tree.
    pub height: u32,
    /// The game state that this node represents.
    pub board: T,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<T::Move>,
    /// Who chose `prev_move`. `None` for the root node.
    pub decided_by: Option<Player>,
    /// The player whose turn it is in this node's game state.
    pub current_player: Player,
    /// The outcome of the game at this node, from the actor's side.
    pub outcome: GameOutcome,
    /// The number of times this node has been visited during the search.
    pub visits: u32,
    /// Visits that ended in a win for the actor, counted only on nodes the actor decided.
    pub wins: u32,
    /// Whether the children have been generated. An expanded node may still have none.
    pub is_expanded: bool,
}

impl<T: Board> MctsNode<T> {
    /// Creates a root node searching on behalf of `actor`.
    pub fn new(board: T, actor: Side) -> Self {
        let current_player = Player::of(board.current_side(), actor);
        let outcome = GameOutcome::from_winner(board.winner(), actor);
        MctsNode {
            height: 0,
            board,
            prev_move: None,
            decided_by: None,
            current_player,
            outcome,
            visits: 0,
            wins: 0,
            is_expanded: false,
        }
    }

    /// Creates the node reached from `parent` by playing `prev_move` into `board`.
    pub fn child(parent: &MctsNode<T>, board: T, prev_move: T::Move, actor: Side) -> Self {
        MctsNode {
            height: parent.height + 1,
            prev_move: Some(prev_move),
            decided_by: Some(parent.current_player),
            ..MctsNode::new(board, actor)
        }
    }

    /// Calculates the win rate of this node.
    pub fn wins_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            (self.wins as f64) / (self.visits as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::fightopia::State;

    #[test]
    fn root_node_from_initial_state() {
        let node = MctsNode::new(State::initial(), Side::Second);

        assert_eq!(node.current_player, Player::Other);
        assert_eq!(node.outcome, GameOutcome::InProgress);
        assert_eq!(node.decided_by, None);
        assert!(!node.is_expanded);
        assert_eq!(node.wins_rate(), 0.0);
    }

    #[test]
    fn child_node_remembers_who_moved() {
        // arrange
        let state = State::initial();
        let root = MctsNode::new(state.clone(), Side::First);
        let action = state.legal_actions(Side::First)[0];

        // act
        let child = MctsNode::child(&root, state.applied(&action).unwrap(), action, Side::First);

        // assert
        assert_eq!(child.height, 1);
        assert_eq!(child.prev_move, Some(action));
        assert_eq!(child.decided_by, Some(Player::Me));
        assert_eq!(child.current_player, Player::Other);
    }

    #[test]
    fn wins_rate() {
        let mut node = MctsNode::new(State::initial(), Side::First);
        node.visits = 4;
        node.wins = 1;
        assert_eq!(node.wins_rate(), 0.25);
    }
}
