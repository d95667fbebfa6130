//! Contains implementations of the `Board` trait.

/// The Fightopia rules engine.
pub mod fightopia;
