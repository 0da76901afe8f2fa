//! Marks, cells, positions and the grid itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Side length of the grid. The board is never resized.
pub const SIZE: usize = 3;

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// One of the two player symbols.
///
/// `Red` always belongs to whoever created the room (the first seat),
/// `Green` to whoever joined second. On the wire they are `"red"` and
/// `"green"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Red,
    Green,
}

impl Mark {
    /// Both marks in seat order.
    pub const ALL: [Mark; 2] = [Mark::Red, Mark::Green];

    /// Returns the opposing mark.
    pub fn other(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
        }
    }
}

/// A single square: empty (`None`) or holding a mark.
pub type Cell = Option<Mark>;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A coordinate that is known to be on the board.
///
/// The only way to get one is [`Position::new`], so every `Position` in
/// circulation already passed the bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Validates `row` and `col` against the grid size.
    pub fn new(row: usize, col: usize) -> Result<Self, BoardError> {
        if row >= SIZE || col >= SIZE {
            return Err(BoardError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Const constructor for compile-time tables. Callers guarantee bounds.
    pub(crate) const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Every position, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| {
            (0..SIZE).map(move |col| Position { row, col })
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 3x3 grid.
///
/// Serializes as a nested array, e.g. `[[null,"red",null],[...],[...]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([[Cell; SIZE]; SIZE]);

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `pos`.
    pub fn get(&self, pos: Position) -> Cell {
        self.0[pos.row][pos.col]
    }

    /// Returns `true` if nothing has been played at `pos`.
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Returns a copy of the board with `mark` placed at `pos`.
    ///
    /// The receiver is left untouched. Checking that the cell is vacant
    /// and that `mark` holds the turn is the caller's job.
    #[must_use]
    pub fn apply_move(mut self, pos: Position, mark: Mark) -> Self {
        debug_assert!(
            self.is_vacant(pos),
            "apply_move onto occupied cell {pos}"
        );
        self.0[pos.row][pos.col] = Some(mark);
        self
    }

    /// Returns `true` if no cell has been played.
    pub fn is_empty(&self) -> bool {
        Position::all().all(|pos| self.is_vacant(pos))
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        Position::all().filter(|pos| !self.is_vacant(*pos)).count()
    }

    /// Raw rows, for rendering.
    pub fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.0
    }
}

impl From<[[Cell; SIZE]; SIZE]> for Board {
    fn from(rows: [[Cell; SIZE]; SIZE]) -> Self {
        Self(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_position_rejects_out_of_bounds() {
        assert_eq!(
            Position::new(3, 0),
            Err(BoardError::OutOfBounds { row: 3, col: 0 })
        );
        assert!(Position::new(0, 3).is_err());
        assert!(Position::new(2, 2).is_ok());
    }

    #[test]
    fn test_position_all_covers_nine_cells() {
        let all: Vec<_> = Position::all().collect();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], pos(0, 0));
        assert_eq!(all[8], pos(2, 2));
    }

    #[test]
    fn test_apply_move_is_pure() {
        let before = Board::new();
        let after = before.apply_move(pos(1, 2), Mark::Green);

        assert!(before.is_empty(), "original board must be unchanged");
        assert_eq!(after.get(pos(1, 2)), Some(Mark::Green));
        assert_eq!(after.filled(), 1);
    }

    #[test]
    fn test_mark_other_flips() {
        assert_eq!(Mark::Red.other(), Mark::Green);
        assert_eq!(Mark::Green.other(), Mark::Red);
    }

    #[test]
    fn test_mark_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mark::Red).unwrap(), "\"red\"");
        assert_eq!(Mark::Green.to_string(), "green");
    }

    #[test]
    fn test_board_json_shape() {
        let board = Board::new().apply_move(pos(0, 1), Mark::Red);
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                [null, "red", null],
                [null, null, null],
                [null, null, null]
            ])
        );
    }
}
