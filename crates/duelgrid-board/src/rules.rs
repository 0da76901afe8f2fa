//! Win and tie evaluation.

use crate::{Board, Mark, Position};

const fn p(row: usize, col: usize) -> Position {
    Position::at(row, col)
}

/// The eight winning lines: three rows, three columns, two diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [p(0, 0), p(0, 1), p(0, 2)],
    [p(1, 0), p(1, 1), p(1, 2)],
    [p(2, 0), p(2, 1), p(2, 2)],
    // Columns
    [p(0, 0), p(1, 0), p(2, 0)],
    [p(0, 1), p(1, 1), p(2, 1)],
    [p(0, 2), p(1, 2), p(2, 2)],
    // Diagonals
    [p(0, 0), p(1, 1), p(2, 2)],
    [p(0, 2), p(1, 1), p(2, 0)],
];

/// Returns `true` if any line is fully occupied by `mark`.
///
/// Each line is judged on its own, so a move that completes two lines at
/// once is still a single win for `mark`.
pub fn evaluate_win(board: &Board, mark: Mark) -> bool {
    LINES
        .iter()
        .any(|line| line.iter().all(|pos| board.get(*pos) == Some(mark)))
}

/// Returns `true` if every cell is occupied.
///
/// A full board is only a tie when the last move did not also win; use
/// [`evaluate_outcome`] to get that precedence right.
pub fn evaluate_tie(board: &Board) -> bool {
    Position::all().all(|pos| !board.is_vacant(pos))
}

/// How a move ended the game, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mover completed a line.
    Won(Mark),
    /// The board is full and nobody completed a line.
    Tie,
}

/// Evaluates the post-move board for the mark that just moved.
///
/// Win takes precedence: filling the last cell while completing a line is
/// a win, never a tie.
pub fn evaluate_outcome(board: &Board, mover: Mark) -> Option<Outcome> {
    if evaluate_win(board, mover) {
        Some(Outcome::Won(mover))
    } else if evaluate_tie(board) {
        Some(Outcome::Tie)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    const R: Cell = Some(Mark::Red);
    const G: Cell = Some(Mark::Green);
    const E: Cell = None;

    fn board_with(mark: Mark, cells: &[Position]) -> Board {
        cells
            .iter()
            .fold(Board::new(), |board, pos| board.apply_move(*pos, mark))
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new();
        assert!(!evaluate_win(&board, Mark::Red));
        assert!(!evaluate_win(&board, Mark::Green));
        assert!(!evaluate_tie(&board));
    }

    #[test]
    fn test_every_line_wins_for_either_mark() {
        for (i, line) in LINES.iter().enumerate() {
            for mark in Mark::ALL {
                let board = board_with(mark, line);
                assert!(evaluate_win(&board, mark), "line {i} for {mark}");
                assert!(
                    !evaluate_win(&board, mark.other()),
                    "line {i} is not {}",
                    mark.other()
                );
            }
        }
    }

    #[test]
    fn test_two_of_three_is_not_a_win() {
        for line in LINES {
            let board = board_with(Mark::Red, &line[..2]);
            assert!(!evaluate_win(&board, Mark::Red));
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = Board::from([[R, R, G], [E, E, E], [E, E, E]]);
        assert!(!evaluate_win(&board, Mark::Red));
        assert!(!evaluate_win(&board, Mark::Green));
    }

    #[test]
    fn test_win_matches_brute_force_over_all_boards() {
        // 3^9 boards: the line table must agree with a direct definition.
        for code in 0..3u32.pow(9) {
            let mut rows = [[E; 3]; 3];
            let mut n = code;
            for pos in Position::all() {
                rows[pos.row()][pos.col()] = match n % 3 {
                    0 => E,
                    1 => R,
                    _ => G,
                };
                n /= 3;
            }
            let board = Board::from(rows);
            for mark in Mark::ALL {
                let m = Some(mark);
                let expected = (0..3).any(|i| (0..3).all(|j| rows[i][j] == m))
                    || (0..3).any(|j| (0..3).all(|i| rows[i][j] == m))
                    || (0..3).all(|i| rows[i][i] == m)
                    || (0..3).all(|i| rows[i][2 - i] == m);
                assert_eq!(
                    evaluate_win(&board, mark),
                    expected,
                    "board {code} mark {mark}"
                );
            }
        }
    }

    #[test]
    fn test_full_board_without_line_is_tie() {
        //  R | G | R
        //  R | G | G
        //  G | R | R
        let board = Board::from([[R, G, R], [R, G, G], [G, R, R]]);
        assert!(evaluate_tie(&board));
        assert_eq!(evaluate_outcome(&board, Mark::Red), Some(Outcome::Tie));
        assert_eq!(evaluate_outcome(&board, Mark::Green), Some(Outcome::Tie));
    }

    #[test]
    fn test_win_on_last_cell_beats_tie() {
        //  R | G | R
        //  G | R | G
        //  G | R | R   <- last red move completes the diagonal
        let board = Board::from([[R, G, R], [G, R, G], [G, R, R]]);
        assert!(evaluate_tie(&board));
        assert_eq!(
            evaluate_outcome(&board, Mark::Red),
            Some(Outcome::Won(Mark::Red))
        );
    }

    #[test]
    fn test_double_line_is_single_win() {
        //  R | R | R
        //  G | R | G
        //  G | G | R
        let board = Board::from([[R, R, R], [G, R, G], [G, G, R]]);
        assert_eq!(
            evaluate_outcome(&board, Mark::Red),
            Some(Outcome::Won(Mark::Red))
        );
    }

    #[test]
    fn test_outcome_none_mid_game() {
        let board = Board::from([[R, E, E], [E, G, E], [E, E, E]]);
        assert_eq!(evaluate_outcome(&board, Mark::Green), None);
    }
}
