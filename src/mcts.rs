use crate::board::{Board, GameOutcome, Player, Side};
use crate::error::{GameError, Result};
use crate::mcts_node::MctsNode;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use ego_tree::{NodeId, NodeRef, Tree};
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Number of nodes the tree reserves room for up front.
pub const DEFAULT_NODE_CAPACITY: usize = 1024;

/// Exploration constant of UCB1. With √2 the score is `w/n + sqrt(2 ln N / n)`.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// How long a search may run. The round in progress always completes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Budget {
    /// Run exactly this many rounds.
    Rounds(u32),
    /// Run rounds until this much wall-clock time has passed, at least one.
    Time(Duration),
}

/// Picks a move for `actor` from `board` within `budget`.
///
/// Fails with [`GameError::NoLegalAction`] when the actor has nothing to play: the game is
/// already decided, it is not the actor's turn, or no move is legal.
pub fn search<T: Board, K: RandomGenerator>(
    board: T,
    actor: Side,
    budget: Budget,
    random: K,
) -> Result<T::Move> {
    if board.current_side() != actor || board.winner().is_some() {
        return Err(GameError::NoLegalAction { side: actor });
    }

    let mut mcts = MonteCarloTreeSearch::builder(board, actor)
        .with_random_generator(random)
        .build();
    mcts.run(budget)?;
    mcts.best_move()
}

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It holds the search tree, the random number generator, and the configuration for the search.
/// Rounds run one after another on a single thread; each one reads the statistics the
/// previous rounds left behind.
pub struct MonteCarloTreeSearch<T: Board, K: RandomGenerator> {
    tree: Tree<MctsNode<T>>,
    root_id: NodeId,
    actor: Side,
    random: K,
    exploration: f64,
    playout_depth: usize,
    next_phase: MctsPhase,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
///
/// This provides a convenient way to configure the MCTS search with different parameters.
pub struct MonteCarloTreeSearchBuilder<T: Board, K: RandomGenerator> {
    board: T,
    actor: Side,
    random_generator: K,
    exploration: f64,
    playout_depth: usize,
    node_capacity: usize,
}

impl<T: Board> MonteCarloTreeSearchBuilder<T, StandardRandomGenerator> {
    /// Creates a new builder searching `board` on behalf of `actor`.
    pub fn new(board: T, actor: Side) -> Self {
        Self {
            board,
            actor,
            random_generator: StandardRandomGenerator::default(),
            exploration: DEFAULT_EXPLORATION,
            playout_depth: 0,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }
}

impl<T: Board, K: RandomGenerator> MonteCarloTreeSearchBuilder<T, K> {
    /// Sets the random number generator used to break ties.
    pub fn with_random_generator<R: RandomGenerator>(
        self,
        rg: R,
    ) -> MonteCarloTreeSearchBuilder<T, R> {
        MonteCarloTreeSearchBuilder {
            board: self.board,
            actor: self.actor,
            random_generator: rg,
            exploration: self.exploration,
            playout_depth: self.playout_depth,
            node_capacity: self.node_capacity,
        }
    }

    /// Sets the UCB1 exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Plays up to `depth` random moves from each leaf before reading the winner.
    /// Zero, the default, judges the leaf by its own state.
    pub fn with_playout_depth(mut self, depth: usize) -> Self {
        self.playout_depth = depth;
        self
    }

    /// Reserves room for `capacity` nodes.
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<T, K> {
        let root = MctsNode::new(self.board, self.actor);
        let tree = Tree::with_capacity(root, self.node_capacity.max(1));
        let root_id = tree.root().id();

        MonteCarloTreeSearch {
            tree,
            root_id,
            actor: self.actor,
            random: self.random_generator,
            exploration: self.exploration,
            playout_depth: self.playout_depth,
            next_phase: MctsPhase::Selection,
        }
    }
}

impl<T: Board> MonteCarloTreeSearch<T, StandardRandomGenerator> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(
        board: T,
        actor: Side,
    ) -> MonteCarloTreeSearchBuilder<T, StandardRandomGenerator> {
        MonteCarloTreeSearchBuilder::new(board, actor)
    }
}

impl<T: Board, K: RandomGenerator> MonteCarloTreeSearch<T, K> {
    /// Returns an immutable reference to the underlying search tree.
    pub fn tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns a reference to the root node of the search tree.
    pub fn root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.node(self.root_id)
    }

    /// The side the search plays for.
    pub fn actor(&self) -> Side {
        self.actor
    }

    /// Returns the next MCTS phase to be performed. Useful for debugging and visualization.
    pub fn next_phase(&self) -> MctsPhase {
        self.next_phase
    }

    /// Executes a single phase of the current round.
    pub fn execute_phase(&mut self) -> Result<()> {
        self.next_phase = match self.next_phase {
            MctsPhase::Selection => MctsPhase::Expansion {
                leaf: self.select_next_node(),
            },
            MctsPhase::Expansion { leaf } => {
                self.expand_node(leaf)?;
                MctsPhase::Simulation { leaf }
            }
            MctsPhase::Simulation { leaf } => {
                let result = self.simulate(leaf)?;
                MctsPhase::Backpropagation { leaf, result }
            }
            MctsPhase::Backpropagation { leaf, result } => {
                self.backpropagate(leaf, result);
                MctsPhase::Selection
            }
        };
        Ok(())
    }

    /// Runs phases until the current round is complete.
    pub fn do_iteration(&mut self) -> Result<()> {
        self.execute_phase()?;
        while self.next_phase != MctsPhase::Selection {
            self.execute_phase()?;
        }
        Ok(())
    }

    /// Runs the MCTS search for a specified number of iterations.
    pub fn iterate_n_times(&mut self, n: u32) -> Result<()> {
        self.run(Budget::Rounds(n)).map(|_| ())
    }

    /// Runs rounds until `budget` is spent and returns how many were run.
    pub fn run(&mut self, budget: Budget) -> Result<u32> {
        let mut rounds = 0;
        match budget {
            Budget::Rounds(n) => {
                while rounds < n {
                    self.do_iteration()?;
                    rounds += 1;
                }
            }
            Budget::Time(limit) => {
                let started = Instant::now();
                loop {
                    self.do_iteration()?;
                    rounds += 1;
                    if started.elapsed() >= limit {
                        break;
                    }
                }
            }
        }

        debug!(
            "ran {} rounds, {} nodes in tree, root visited {} times",
            rounds,
            self.tree.values().count(),
            self.root().value().visits
        );
        Ok(rounds)
    }

    /// Returns the move of the most visited child of the root, ties broken at random.
    pub fn best_move(&mut self) -> Result<T::Move> {
        self.expand_node(self.root_id)?;

        let actor = self.actor;
        let no_move = move || GameError::NoLegalAction { side: actor };
        let root = self.root();
        if root.value().current_player != Player::Me {
            return Err(no_move());
        }

        let max_visits = root
            .children()
            .map(|child| child.value().visits)
            .max()
            .ok_or_else(no_move)?;
        let most_visited: Vec<NodeId> = root
            .children()
            .filter(|child| child.value().visits == max_visits)
            .map(|child| child.id())
            .collect();

        let best_id = *self
            .random
            .get_random_from_slice(&most_visited)
            .ok_or_else(no_move)?;
        let best = self.node(best_id).value();
        debug!(
            "best move {:?}: {} visits, {} wins, {} candidates",
            best.prev_move,
            best.visits,
            best.wins,
            most_visited.len()
        );
        best.prev_move.clone().ok_or_else(no_move)
    }

    fn node(&self, id: NodeId) -> NodeRef<'_, MctsNode<T>> {
        self.tree
            .get(id)
            .expect("node ids are only handed out by this tree")
    }

    /// Descends from the root while the current node has known children, and returns the node
    /// where the descent stopped.
    fn select_next_node(&mut self) -> NodeId {
        let mut current = self.root_id;
        loop {
            let node = self.node(current);
            if !node.value().is_expanded || !node.has_children() {
                return current;
            }

            let candidates = match node.value().current_player {
                Player::Me => self.most_urgent_children(current),
                Player::Other => self.least_visited_children(current),
            };
            match self.random.get_random_from_slice(&candidates) {
                Some(&next) => current = next,
                None => return current,
            }
        }
    }

    /// Children to pick from at one of the actor's own decisions. Unvisited children come
    /// first; after that the ones with the highest UCB1 score.
    fn most_urgent_children(&self, parent_id: NodeId) -> Vec<NodeId> {
        let parent = self.node(parent_id);
        let unvisited: Vec<NodeId> = parent
            .children()
            .filter(|child| child.value().visits == 0)
            .map(|child| child.id())
            .collect();
        if !unvisited.is_empty() {
            return unvisited;
        }

        let parent_visits = parent.value().visits;
        let mut best = Vec::new();
        let mut max_ucb = f64::MIN;
        for child in parent.children() {
            let data = child.value();
            let ucb = self.ucb_value(parent_visits, data.wins, data.visits);
            if ucb > max_ucb {
                max_ucb = ucb;
                best.clear();
                best.push(child.id());
            } else if ucb == max_ucb {
                best.push(child.id());
            }
        }
        best
    }

    /// Children to pick from at an opponent's decision: the least explored ones.
    fn least_visited_children(&self, parent_id: NodeId) -> Vec<NodeId> {
        let parent = self.node(parent_id);
        let Some(min_visits) = parent.children().map(|child| child.value().visits).min() else {
            return Vec::new();
        };
        parent
            .children()
            .filter(|child| child.value().visits == min_visits)
            .map(|child| child.id())
            .collect()
    }

    /// Creates one child per legal move. Decided positions get no children.
    fn expand_node(&mut self, node_id: NodeId) -> Result<()> {
        let node = self.node(node_id).value();
        if node.is_expanded {
            return Ok(());
        }

        let possible_moves = match node.outcome {
            GameOutcome::InProgress => node.board.available_moves(),
            GameOutcome::Win | GameOutcome::Lose => Vec::new(),
        };
        let mut children = Vec::with_capacity(possible_moves.len());
        for possible_move in possible_moves {
            let mut board_clone = node.board.clone();
            board_clone.perform_move(&possible_move)?;
            children.push(MctsNode::child(node, board_clone, possible_move, self.actor));
        }

        let Some(mut parent) = self.tree.get_mut(node_id) else {
            return Ok(());
        };
        parent.value().is_expanded = true;
        for child in children {
            parent.append(child);
        }
        Ok(())
    }

    /// Judges the leaf. Without a playout this is the leaf's own outcome; with one, random
    /// moves are played from a copy of its state first.
    fn simulate(&mut self, node_id: NodeId) -> Result<GameOutcome> {
        let node = self.node(node_id).value();
        if self.playout_depth == 0 || node.outcome != GameOutcome::InProgress {
            return Ok(node.outcome);
        }

        let mut board = node.board.clone();
        for _ in 0..self.playout_depth {
            if board.winner().is_some() {
                break;
            }
            let possible_moves = board.available_moves();
            let Some(random_move) = self.random.get_random_from_slice(&possible_moves) else {
                break;
            };
            board.perform_move(random_move)?;
        }
        Ok(GameOutcome::from_winner(board.winner(), self.actor))
    }

    /// Propagates the result of a round from the leaf up to the root.
    fn backpropagate(&mut self, node_id: NodeId, outcome: GameOutcome) {
        let leaf = self.node(node_id);
        trace!("leaf at height {} resolved as {:?}", leaf.value().height, outcome);
        let branch: Vec<NodeId> = std::iter::once(node_id)
            .chain(leaf.ancestors().map(|ancestor| ancestor.id()))
            .collect();

        let is_win = outcome == GameOutcome::Win;
        for id in &branch {
            if let Some(mut node) = self.tree.get_mut(*id) {
                let mcts_node = node.value();
                mcts_node.visits += 1;
                if is_win && mcts_node.decided_by == Some(Player::Me) {
                    mcts_node.wins += 1;
                }
            }
        }
    }

    /// Calculates the UCB1 (Upper Confidence Bound 1) value for a visited node.
    fn ucb_value(&self, total_visits: u32, node_wins: u32, node_visits: u32) -> f64 {
        (node_wins as f64) / (node_visits as f64)
            + self.exploration * f64::sqrt(f64::ln(total_visits as f64) / (node_visits as f64))
    }
}

/// Represents the four phases of one MCTS round.
///
/// This enum is used to manage the state of the search process.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MctsPhase {
    /// **Selection**: Start from the root and select successive child nodes until a leaf node
    /// is reached.
    Selection,
    /// **Expansion**: Create the children of the selected leaf.
    Expansion {
        /// The leaf node to be expanded.
        leaf: NodeId,
    },
    /// **Simulation**: Decide the result of the round from the leaf.
    Simulation {
        /// The leaf the result is taken from.
        leaf: NodeId,
    },
    /// **Backpropagation**: Update the statistics of the nodes on the path from the leaf to
    /// the root.
    Backpropagation {
        /// The leaf the round ended at.
        leaf: NodeId,
        /// The result of the simulation.
        result: GameOutcome,
    },
}

impl MctsPhase {
    /// Returns the name of the current MCTS phase as a string.
    pub fn get_name(&self) -> &'static str {
        match self {
            MctsPhase::Selection => "Selection",
            MctsPhase::Expansion { .. } => "Expansion",
            MctsPhase::Simulation { .. } => "Simulation",
            MctsPhase::Backpropagation { .. } => "Backpropagation",
        }
    }
}
