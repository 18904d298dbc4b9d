use crate::rules::Conflict;
use crate::{Cell, Position};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Technique that determined a cell.
///
/// The `Display` form is a stable tag consumed verbatim by downstream
/// tooling; do not rename variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technique {
    // Deductive rules, in sweep order
    AvoidThree,
    Balance,
    DuplicatePrevention,
    ForcedMove,

    // Trial and error
    Search,
}

impl Technique {
    /// The four deductive rules in the order a sweep applies them.
    pub fn deductive() -> &'static [Technique] {
        &[
            Technique::AvoidThree,
            Technique::Balance,
            Technique::DuplicatePrevention,
            Technique::ForcedMove,
        ]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Technique::AvoidThree => "AvoidThree",
            Technique::Balance => "Balance",
            Technique::DuplicatePrevention => "DuplicatePrevention",
            Technique::ForcedMove => "ForcedMove",
            Technique::Search => "Search",
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One cell filled by a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub pos: Position,
    pub value: Cell,
    pub technique: Technique,
}

impl Move {
    pub fn new(pos: Position, value: Cell, technique: Technique) -> Self {
        Self { pos, value, technique }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Set {} = {} [{}]", self.pos, self.value, self.technique)
    }
}

/// Chronological record of the cells filled during one solver call.
pub type MovesLog = Vec<Move>;

/// Distinct techniques appearing in a moves log, in vocabulary order.
pub fn techniques_used(moves: &[Move]) -> Vec<Technique> {
    let mut used: Vec<Technique> = moves.iter().map(|m| m.technique).collect();
    used.sort();
    used.dedup();
    used
}

/// Result of running the deductive rules to a fixed point
#[derive(Debug, Clone, Serialize)]
pub struct Deduction {
    /// Grid is complete and fully valid
    pub solved: bool,
    pub moves: MovesLog,
    /// Number of sweeps performed
    pub sweeps: usize,
    /// Set when the partial grid was found to be contradictory
    pub contradiction: Option<Conflict>,
}

/// How a search call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    Solved,
    Unsolvable,
    BudgetExhausted,
}

/// Counters collected during search. Diagnostic only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub backtrack_attempts: u64,
    pub constraint_checks: u64,
    pub placements: u64,
    pub forced_moves: u64,
    pub propagation_time: Duration,
    pub search_time: Duration,
}

impl SearchStats {
    pub fn total_time(&self) -> Duration {
        self.propagation_time + self.search_time
    }
}

/// Result of a search call
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub moves: MovesLog,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }
}

/// What the solution count says about a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Uniqueness {
    /// Exactly one completion exists
    Unique,
    /// Two or more completions exist
    Multiple,
    /// No completion exists
    NoSolution,
    /// Counting ran out of budget
    Unknown,
}

/// Strategy that completed the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Deductive,
    Search,
}

/// Result of [`Solver::solve`](super::Solver::solve)
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub solved: bool,
    /// Strategy that finished the grid, if any
    pub strategy: Option<Strategy>,
    pub uniqueness: Uniqueness,
    pub moves: MovesLog,
    pub stats: SearchStats,
}

/// Type of hint provided
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HintType {
    /// Place this value in this cell
    SetValue { pos: Position, value: Cell },
}

/// A hint for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hint {
    /// The technique used to find this hint
    pub technique: Technique,
    /// The type of hint
    pub hint_type: HintType,
    /// Explanation of the hint
    pub explanation: String,
    /// Cells involved in the reasoning
    pub involved_cells: Vec<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display_keeps_tag() {
        let m = Move::new(Position::new(4, 1), Cell::One, Technique::AvoidThree);
        assert_eq!(m.to_string(), "Set (B,5) = 1 [AvoidThree]");
        assert!(m.to_string().contains("AvoidThree"));
    }

    #[test]
    fn test_techniques_used_dedups_in_order() {
        let moves = vec![
            Move::new(Position::new(0, 0), Cell::One, Technique::ForcedMove),
            Move::new(Position::new(0, 1), Cell::Zero, Technique::AvoidThree),
            Move::new(Position::new(0, 2), Cell::One, Technique::ForcedMove),
        ];
        assert_eq!(
            techniques_used(&moves),
            vec![Technique::AvoidThree, Technique::ForcedMove]
        );
    }

    #[test]
    fn test_technique_serializes_as_tag() {
        let json = serde_json::to_string(&Technique::DuplicatePrevention).unwrap();
        assert_eq!(json, "\"DuplicatePrevention\"");
    }
}
