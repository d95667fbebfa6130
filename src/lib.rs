//! A Fightopia rules engine with a Monte Carlo tree search player.
//!
//! The engine validates and applies actions on an 8x8 board and detects the end of the game.
//! The search is generic over the `Board` trait and picks a move for one side within a budget
//! of rounds or wall-clock time.
//!
//! # Example
//!
//! ```rust
//! use fightopia::board::Side;
//! use fightopia::boards::fightopia::State;
//! use fightopia::mcts::{Budget, MonteCarloTreeSearch};
//! use fightopia::random::SeededRandomGenerator;
//!
//! // Start from the standard layout, the first side to move
//! let mut state = State::initial();
//!
//! // Create and configure a new MCTS search instance using the builder
//! let mut mcts = MonteCarloTreeSearch::builder(state.clone(), Side::First)
//!     .with_random_generator(SeededRandomGenerator::new(7))
//!     .build();
//!
//! // Run the search for a number of rounds and play the most visited action
//! mcts.run(Budget::Rounds(200))?;
//! let action = mcts.best_move()?;
//! state.apply(&action)?;
//!
//! assert_eq!(state.side_to_move(), Side::Second);
//! # Ok::<(), fightopia::error::GameError>(())
//! ```

/// Contains the `Board` trait and the side, player and outcome enums shared by the search.
pub mod board;
/// Contains the game implementations of the `Board` trait.
pub mod boards;
/// The error type returned by the engine and the search.
pub mod error;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
