//! Error types for the board engine.

/// Errors raised by board construction helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A row or column index outside `0..=2`.
    #[error("position ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
}
