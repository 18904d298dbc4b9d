//! Move -> Hint conversion and explanation generation.
//!
//! The solvers only record what they placed. This module looks at the grid as
//! it was just before a move and recovers the cells that justify it.

use super::deduce::single_gap_pair;
use super::types::{Hint, HintType, Move, Technique};
use crate::rules::Line;
use crate::{Cell, Grid, Position};

/// Evidence behind a single move.
#[derive(Debug, Clone)]
pub enum ExplanationData {
    /// Two equal neighbours in a 3-window
    AvoidThree { pair: [Position; 2], value: Cell },
    /// A line already holding half of the other digit
    Balance { line: Line, value: Cell },
    /// A nearly identical line
    DuplicatePrevention { line: Line, partner: Line },
    /// The other digit fails a local check
    ForcedMove { blocked: Cell },
    /// No rule applies; the value comes from a completed search
    Search,
}

/// A move together with its evidence.
#[derive(Debug, Clone)]
pub struct Finding {
    pub mv: Move,
    pub involved_cells: Vec<Position>,
    pub explanation: ExplanationData,
}

impl Finding {
    /// Reconstruct the evidence for `mv` from the grid it was played on.
    pub fn from_move(grid: &Grid, mv: Move) -> Self {
        let (explanation, involved_cells) = match mv.technique {
            Technique::AvoidThree => avoid_three_evidence(grid, mv),
            Technique::Balance => balance_evidence(grid, mv),
            Technique::DuplicatePrevention => duplicate_evidence(grid, mv),
            Technique::ForcedMove => (
                ExplanationData::ForcedMove {
                    blocked: mv.value.opposite(),
                },
                neighbours(grid, mv.pos),
            ),
            Technique::Search => (ExplanationData::Search, Vec::new()),
        };
        Self {
            mv,
            involved_cells,
            explanation,
        }
    }

    /// Convert this Finding into a public Hint.
    pub fn to_hint(&self) -> Hint {
        Hint {
            technique: self.mv.technique,
            hint_type: HintType::SetValue {
                pos: self.mv.pos,
                value: self.mv.value,
            },
            explanation: self.render_explanation(),
            involved_cells: self.involved_cells.clone(),
        }
    }

    fn render_explanation(&self) -> String {
        let Move { pos, value, .. } = self.mv;
        match &self.explanation {
            ExplanationData::AvoidThree { pair, value: other } => format!(
                "{} and {} are both {}, so {} must be {} to avoid three {}s in a row.",
                pair[0], pair[1], other, pos, value, other
            ),
            ExplanationData::Balance { line, value: full } => format!(
                "{} already holds all of its {}s, so {} must be {}.",
                line, full, pos, value
            ),
            ExplanationData::DuplicatePrevention { line, partner } => format!(
                "{} matches {} everywhere both are filled; {} must be {} so they can still differ.",
                line, partner, pos, value
            ),
            ExplanationData::ForcedMove { blocked } => format!(
                "A {} at {} would make three in a row or overfill its row or column, so it must be {}.",
                blocked, pos, value
            ),
            ExplanationData::Search => format!(
                "No rule applies here; the only completion places {} at {}.",
                value, pos
            ),
        }
    }
}

/// Hint for the move `mv`, judged against the grid before it was played.
pub fn hint_for(grid: &Grid, mv: Move) -> Hint {
    Finding::from_move(grid, mv).to_hint()
}

fn avoid_three_evidence(grid: &Grid, mv: Move) -> (ExplanationData, Vec<Position>) {
    let n = grid.size();
    let other = mv.value.opposite();
    for line in [Line::Row(mv.pos.row), Line::Column(mv.pos.col)] {
        for start in 0..n.saturating_sub(2) {
            let window: Vec<Position> = (start..start + 3).map(|i| line.position(i)).collect();
            if !window.contains(&mv.pos) {
                continue;
            }
            let rest: Vec<Position> = window.into_iter().filter(|&p| p != mv.pos).collect();
            if rest.iter().all(|&p| grid.get(p) == other) {
                let pair = [rest[0], rest[1]];
                return (ExplanationData::AvoidThree { pair, value: other }, rest);
            }
        }
    }
    (ExplanationData::ForcedMove { blocked: other }, Vec::new())
}

fn balance_evidence(grid: &Grid, mv: Move) -> (ExplanationData, Vec<Position>) {
    let n = grid.size();
    let full = mv.value.opposite();
    for line in [Line::Row(mv.pos.row), Line::Column(mv.pos.col)] {
        let filled: Vec<Position> = line
            .positions(n)
            .filter(|&p| grid.get(p) == full)
            .collect();
        if filled.len() == grid.half() {
            return (ExplanationData::Balance { line, value: full }, filled);
        }
    }
    (ExplanationData::ForcedMove { blocked: full }, Vec::new())
}

fn duplicate_evidence(grid: &Grid, mv: Move) -> (ExplanationData, Vec<Position>) {
    let n = grid.size();
    let candidates: [(Line, fn(usize) -> Line); 2] = [
        (Line::Row(mv.pos.row), Line::Row),
        (Line::Column(mv.pos.col), Line::Column),
    ];
    for (line, family) in candidates {
        for other in (0..n).map(family) {
            if other == line {
                continue;
            }
            let Some((pa, pb)) = single_gap_pair(grid, line, other) else {
                continue;
            };
            if pa == mv.pos {
                let involved = other
                    .positions(n)
                    .filter(|&p| p != pb && grid.get(p).is_filled())
                    .collect();
                return (
                    ExplanationData::DuplicatePrevention {
                        line,
                        partner: other,
                    },
                    involved,
                );
            }
        }
    }
    (
        ExplanationData::ForcedMove {
            blocked: mv.value.opposite(),
        },
        Vec::new(),
    )
}

/// Filled cells within two steps of `pos` along its row and column.
fn neighbours(grid: &Grid, pos: Position) -> Vec<Position> {
    let n = grid.size();
    let mut cells = Vec::new();
    for line in [Line::Row(pos.row), Line::Column(pos.col)] {
        let idx = match line {
            Line::Row(_) => pos.col,
            Line::Column(_) => pos.row,
        };
        for i in idx.saturating_sub(2)..(idx + 3).min(n) {
            let p = line.position(i);
            if p != pos && grid.get(p).is_filled() {
                cells.push(p);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY: &str = "..0.../..0..1/1...0./....../1.00../....11";

    #[test]
    fn test_avoid_three_hint() {
        let grid = Grid::from_string(EASY).unwrap();
        let mv = Move::new(Position::new(4, 1), Cell::One, Technique::AvoidThree);
        let hint = hint_for(&grid, mv);
        assert_eq!(hint.technique, Technique::AvoidThree);
        assert_eq!(
            hint.involved_cells,
            vec![Position::new(4, 2), Position::new(4, 3)]
        );
        assert_eq!(
            hint.explanation,
            "(C,5) and (D,5) are both 0, so (B,5) must be 1 to avoid three 0s in a row."
        );
    }

    #[test]
    fn test_balance_hint() {
        let grid = Grid::from_string("0.0.0./....../....../....../....../......").unwrap();
        let mv = Move::new(Position::new(0, 5), Cell::One, Technique::Balance);
        let hint = hint_for(&grid, mv);
        assert_eq!(hint.involved_cells.len(), 3);
        assert!(hint.explanation.starts_with("row 1 already holds all of its 0s"));
    }

    #[test]
    fn test_duplicate_prevention_hint() {
        let grid = Grid::from_string("0.01/1..0/.101/1..0").unwrap();
        let mv = Move::new(Position::new(0, 1), Cell::One, Technique::DuplicatePrevention);
        let hint = hint_for(&grid, mv);
        assert!(hint.explanation.starts_with("row 1 matches row 3"));
        assert_eq!(
            hint.involved_cells,
            vec![Position::new(2, 1), Position::new(2, 2), Position::new(2, 3)]
        );
    }

    #[test]
    fn test_search_hint_has_no_evidence() {
        let grid = Grid::new(4).unwrap();
        let mv = Move::new(Position::new(0, 0), Cell::Zero, Technique::Search);
        let hint = hint_for(&grid, mv);
        assert!(hint.involved_cells.is_empty());
        assert!(hint.explanation.contains("No rule applies"));
    }
}
