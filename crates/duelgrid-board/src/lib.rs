//! Board engine for duelgrid.
//!
//! Pure logic with no I/O and no randomness: a 3x3 grid of [`Cell`]s,
//! move application, and win/tie evaluation. Everything here is
//! deterministic so the rules can be tested without a server.
//!
//! # Key types
//!
//! - [`Mark`]: the two player symbols
//! - [`Board`]: the fixed 3x3 grid
//! - [`Position`]: a bounds-checked coordinate
//! - [`Outcome`]: what a move produced (win beats tie)

mod board;
mod error;
mod rules;

pub use board::{Board, Cell, Mark, Position, SIZE};
pub use error::BoardError;
pub use rules::{LINES, Outcome, evaluate_outcome, evaluate_tie, evaluate_win};
