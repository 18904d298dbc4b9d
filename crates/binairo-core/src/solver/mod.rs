//! Solver orchestrator.
//!
//! Runs the deductive rules first and escalates to backtracking search only
//! when they get stuck. A search result is checked against a solution count
//! before it is reported as unique.

mod types;
pub mod budget;
pub mod deduce;
pub mod backtrack;
pub(crate) mod explain;

use crate::rules;
use crate::Grid;
use budget::Limits;
use log::debug;
use std::time::Duration;

pub use budget::{Deadline, SearchBudget, StepLimit, Unbounded};
pub use types::{
    techniques_used, Deduction, Hint, HintType, Move, MovesLog, SearchOutcome, SearchStats,
    SearchStatus, Solution, Strategy, Technique, Uniqueness,
};

/// Resource limits applied to every search the solver starts.
///
/// Both limits default to `None`: the engine imposes no bound of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of search nodes per call
    pub step_limit: Option<u64>,
    /// Wall-clock limit per call
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    fn budget(&self) -> Limits {
        Limits::new(self.step_limit, self.time_limit)
    }
}

/// Stateless apart from its limits; all solving state is per call.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver without search limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Apply the deductive rules to a fixed point.
    ///
    /// The grid is left where deduction stopped.
    pub fn solve_deductive(&self, grid: &mut Grid) -> Deduction {
        let deduction = deduce::deduce(grid);
        if deduction.solved {
            assert!(rules::is_fully_valid(grid), "deduction reported an invalid grid");
        }
        deduction
    }

    /// Backtracking search under the configured limits.
    ///
    /// On failure the grid is restored.
    pub fn solve_search(&self, grid: &mut Grid) -> SearchOutcome {
        let outcome = backtrack::solve(grid, &mut self.config.budget());
        if outcome.solved() {
            assert!(rules::is_fully_valid(grid), "search reported an invalid grid");
        }
        outcome
    }

    /// Count solutions up to `limit`; `None` if the limits ran out first.
    pub fn count_solutions(&self, grid: &Grid, limit: usize) -> Option<usize> {
        let mut working = grid.clone();
        backtrack::count_solutions(&mut working, limit, &mut self.config.budget())
    }

    /// Check if the puzzle has exactly one solution.
    pub fn has_unique_solution(&self, grid: &Grid) -> bool {
        self.count_solutions(grid, 2) == Some(1)
    }

    /// Classify the puzzle by its solution count.
    pub fn verify_unique(&self, grid: &Grid) -> Uniqueness {
        match self.count_solutions(grid, 2) {
            Some(0) => Uniqueness::NoSolution,
            Some(1) => Uniqueness::Unique,
            Some(_) => Uniqueness::Multiple,
            None => Uniqueness::Unknown,
        }
    }

    /// Solve the puzzle: deduce, then search from the stuck state.
    ///
    /// On success the grid holds the completion and the moves log lists every
    /// filled cell in order. On failure the grid is restored to its clues.
    pub fn solve(&self, grid: &mut Grid) -> Solution {
        let deduction = self.solve_deductive(grid);
        if deduction.solved {
            return Solution {
                solved: true,
                strategy: Some(Strategy::Deductive),
                uniqueness: Uniqueness::Unique,
                moves: deduction.moves,
                stats: SearchStats::default(),
            };
        }

        let mut moves = deduction.moves;
        if let Some(conflict) = deduction.contradiction {
            debug!("no solution: {}", conflict);
            restore(grid, &moves);
            return Solution {
                solved: false,
                strategy: None,
                uniqueness: Uniqueness::NoSolution,
                moves: MovesLog::new(),
                stats: SearchStats::default(),
            };
        }

        debug!(
            "deduction stuck after {} moves with {} empty cells, escalating to search",
            moves.len(),
            grid.empty_count()
        );
        let outcome = self.solve_search(grid);
        if !outcome.solved() {
            restore(grid, &moves);
            let uniqueness = match outcome.status {
                SearchStatus::BudgetExhausted => Uniqueness::Unknown,
                _ => Uniqueness::NoSolution,
            };
            return Solution {
                solved: false,
                strategy: None,
                uniqueness,
                moves: MovesLog::new(),
                stats: outcome.stats,
            };
        }

        moves.extend(outcome.moves);
        let mut clues = grid.clone();
        restore(&mut clues, &moves);
        let uniqueness = self.verify_unique(&clues);
        debug!("search completion is {:?}", uniqueness);

        Solution {
            solved: true,
            strategy: Some(Strategy::Search),
            uniqueness,
            moves,
            stats: outcome.stats,
        }
    }

    /// Get a hint for the current position without changing it.
    ///
    /// Deductive rules are tried first; search is the last resort.
    pub fn hint(&self, grid: &Grid) -> Option<Hint> {
        if let Some(mv) = deduce::next_deduction(grid) {
            return Some(explain::hint_for(grid, mv));
        }
        if rules::find_conflict(grid).is_some() || grid.is_complete() {
            return None;
        }

        let mut working = grid.clone();
        let outcome = self.solve_search(&mut working);
        let first = outcome
            .moves
            .into_iter()
            .find(|m| m.technique == Technique::Search)?;
        Some(explain::hint_for(grid, first))
    }
}

/// Clear every cell named in `moves`.
fn restore(grid: &mut Grid, moves: &[Move]) {
    for m in moves.iter().rev() {
        grid.clear(m.pos);
    }
}
