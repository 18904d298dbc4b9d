//! Errors raised while building a grid from caller input.
//!
//! Only malformed input is an error. A puzzle that cannot be solved is a
//! normal outcome and is reported through the solver results instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no rows")]
    EmptyGrid,
    #[error("grid side {0} is odd; binary puzzles need an even side")]
    OddSize(usize),
    #[error("row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid cell value at ({row},{col}): {value}. Must be null, 0, or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
    #[error("invalid character {ch:?} at ({row},{col}); expected '0', '1' or '.'")]
    InvalidChar { row: usize, col: usize, ch: char },
}
