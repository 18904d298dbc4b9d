//! Constraint predicates shared by both solvers.
//!
//! `placement_valid` is the only local check the solvers use while filling
//! cells; `is_fully_valid` is the only authority on whether a grid is solved.

use crate::{Cell, Grid, Position};
use serde::Serialize;
use std::fmt;

/// A row or a column of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Line {
    Row(usize),
    Column(usize),
}

impl Line {
    /// Every row followed by every column.
    pub fn all(size: usize) -> impl Iterator<Item = Line> {
        (0..size).map(Line::Row).chain((0..size).map(Line::Column))
    }

    /// Position of the `i`-th cell along this line.
    pub fn position(self, i: usize) -> Position {
        match self {
            Line::Row(row) => Position::new(row, i),
            Line::Column(col) => Position::new(i, col),
        }
    }

    pub fn positions(self, size: usize) -> impl Iterator<Item = Position> {
        (0..size).map(move |i| self.position(i))
    }

    pub fn cells(self, grid: &Grid) -> Vec<Cell> {
        self.positions(grid.size()).map(|pos| grid.get(pos)).collect()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row(row) => write!(f, "row {}", row + 1),
            Line::Column(col) => write!(f, "column {}", Position::new(0, *col).col_letter()),
        }
    }
}

/// A rule violation already present among the placed cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Conflict {
    /// Three equal digits in a row, starting at `start`
    ThreeInARow { line: Line, start: usize },
    /// A line holds more than half of one digit
    Overfilled { line: Line, value: Cell },
    /// Two complete lines are identical
    DuplicateLines { first: Line, second: Line },
    /// An empty cell where neither digit can go
    NoCandidate { pos: Position },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::ThreeInARow { line, start } => {
                write!(f, "three equal digits in {} starting at {}", line, line.position(*start))
            }
            Conflict::Overfilled { line, value } => {
                write!(f, "{} holds more than half {}s", line, value)
            }
            Conflict::DuplicateLines { first, second } => {
                write!(f, "{} and {} are identical", first, second)
            }
            Conflict::NoCandidate { pos } => write!(f, "no digit fits at {}", pos),
        }
    }
}

/// Would `value` at `pos` break a local rule?
///
/// Checks every 3-window through `pos` along its row and column and the
/// running count of `value` in both lines. Pure: the grid is not touched,
/// and whatever currently sits at `pos` is treated as replaced by `value`.
pub fn placement_valid(grid: &Grid, pos: Position, value: Cell) -> bool {
    debug_assert!(value.is_filled());
    let n = grid.size();
    let at = |p: Position| if p == pos { value } else { grid.get(p) };

    for line in [Line::Row(pos.row), Line::Column(pos.col)] {
        let idx = match line {
            Line::Row(_) => pos.col,
            Line::Column(_) => pos.row,
        };
        if n >= 3 {
            let first = idx.saturating_sub(2);
            let last = idx.min(n - 3);
            for start in first..=last {
                if (start..start + 3).all(|i| at(line.position(i)) == value) {
                    return false;
                }
            }
        }
        let count = line.positions(n).filter(|&p| at(p) == value).count();
        if count > grid.half() {
            return false;
        }
    }
    true
}

/// No cell is empty.
pub fn is_complete(grid: &Grid) -> bool {
    grid.is_complete()
}

/// Complete and satisfying every rule: balanced lines, no three-runs, and
/// pairwise distinct rows and columns.
pub fn is_fully_valid(grid: &Grid) -> bool {
    is_complete(grid) && find_conflict(grid).is_none() && lines_balanced(grid)
}

fn lines_balanced(grid: &Grid) -> bool {
    Line::all(grid.size()).all(|line| {
        let cells = line.cells(grid);
        let zeros = cells.iter().filter(|&&c| c == Cell::Zero).count();
        zeros == grid.half() && cells.len() - zeros == grid.half()
    })
}

/// First violation already present among placed cells, if any.
///
/// Empty cells never conflict; duplicate lines are only reported once both
/// lines are complete.
pub fn find_conflict(grid: &Grid) -> Option<Conflict> {
    let n = grid.size();
    let half = grid.half();

    for line in Line::all(n) {
        let cells = line.cells(grid);
        for start in 0..n.saturating_sub(2) {
            let window = &cells[start..start + 3];
            if window[0].is_filled() && window.iter().all(|&c| c == window[0]) {
                return Some(Conflict::ThreeInARow { line, start });
            }
        }
        for value in crate::DIGITS {
            if cells.iter().filter(|&&c| c == value).count() > half {
                return Some(Conflict::Overfilled { line, value });
            }
        }
    }

    for lines in [
        (0..n).map(Line::Row).collect::<Vec<_>>(),
        (0..n).map(Line::Column).collect::<Vec<_>>(),
    ] {
        let contents: Vec<Vec<Cell>> = lines.iter().map(|l| l.cells(grid)).collect();
        for a in 0..n {
            if contents[a].iter().any(|c| c.is_empty()) {
                continue;
            }
            for b in (a + 1)..n {
                if contents[a] == contents[b] {
                    return Some(Conflict::DuplicateLines {
                        first: lines[a],
                        second: lines[b],
                    });
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLUTION: &str = "110100/010011/101100/001101/110010/001011";

    #[test]
    fn test_solution_is_fully_valid() {
        let grid = Grid::from_string(SOLUTION).unwrap();
        assert!(is_fully_valid(&grid));
        assert_eq!(find_conflict(&grid), None);
    }

    #[test]
    fn test_valid_grid_satisfies_every_invariant() {
        let grid = Grid::from_string(SOLUTION).unwrap();
        for line in Line::all(6) {
            let cells = line.cells(&grid);
            assert_eq!(cells.iter().filter(|&&c| c == Cell::Zero).count(), 3);
            assert_eq!(cells.iter().filter(|&&c| c == Cell::One).count(), 3);
            for w in cells.windows(3) {
                assert!(!(w[0] == w[1] && w[1] == w[2]));
            }
        }
    }

    #[test]
    fn test_placement_valid_three_run() {
        let grid = Grid::from_string("00.101/....../....../....../....../......").unwrap();
        assert!(!placement_valid(&grid, Position::new(0, 2), Cell::Zero));
        assert!(placement_valid(&grid, Position::new(0, 2), Cell::One));
        // Unchanged by the check
        assert_eq!(grid.get(Position::new(0, 2)), Cell::Empty);
    }

    #[test]
    fn test_placement_valid_count() {
        let grid = Grid::from_string("0.0.0./....../....../....../....../......").unwrap();
        assert!(!placement_valid(&grid, Position::new(0, 5), Cell::Zero));
        assert!(placement_valid(&grid, Position::new(0, 5), Cell::One));
    }

    #[test]
    fn test_placement_valid_column_window() {
        let grid = Grid::from_string("1...../1...../....../....../....../......").unwrap();
        assert!(!placement_valid(&grid, Position::new(2, 0), Cell::One));
        assert!(placement_valid(&grid, Position::new(2, 0), Cell::Zero));
    }

    #[test]
    fn test_incomplete_is_not_valid() {
        let grid = Grid::from_string("..0.../..0..1/1...0./....../1.00../....11").unwrap();
        assert!(!is_complete(&grid));
        assert!(!is_fully_valid(&grid));
        assert_eq!(find_conflict(&grid), None);
    }

    #[test]
    fn test_three_run_conflict() {
        let grid = Grid::from_string("111001/....../....../....../....../......").unwrap();
        assert_eq!(
            find_conflict(&grid),
            Some(Conflict::ThreeInARow { line: Line::Row(0), start: 0 })
        );
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        // Balanced, run-free, but rows 1 and 2 are equal
        let grid = Grid::from_string("0101/0101/1010/1010").unwrap();
        assert!(!is_fully_valid(&grid));
        assert_eq!(
            find_conflict(&grid),
            Some(Conflict::DuplicateLines { first: Line::Row(0), second: Line::Row(1) })
        );
    }

    #[test]
    fn test_two_by_two() {
        assert!(is_fully_valid(&Grid::from_string("01/10").unwrap()));
        assert!(!is_fully_valid(&Grid::from_string("01/01").unwrap()));
    }
}
