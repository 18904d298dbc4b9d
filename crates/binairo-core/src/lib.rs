//! Binairo Core Engine
//!
//! Solving engine for binary-grid puzzles (Binairo, also sold as Takuzu):
//! an even-sided square grid filled with 0s and 1s so that
//!
//! - no row or column holds three equal digits in a row,
//! - every row and column holds as many 0s as 1s,
//! - no two rows and no two columns are identical.
//!
//! Two strategies share one grid model: a deductive solver that applies the
//! rules a human would and never guesses, and a backtracking search that
//! always finds a completion when one exists. Every filled cell is recorded
//! as a [`Move`] tagged with the [`Technique`] that produced it.
//!
//! ```
//! use binairo_core::{Grid, Solver};
//!
//! let mut grid = Grid::from_string("..0.../..0..1/1...0./....../1.00../....11").unwrap();
//! let solution = Solver::new().solve(&mut grid);
//! assert!(solution.solved);
//! ```

mod error;
mod grid;
pub mod rules;
pub mod solver;

pub use error::GridError;
pub use grid::{Cell, Grid, Position, DIGITS};
pub use rules::{Conflict, Line};
pub use solver::{
    Deadline, Deduction, Hint, HintType, Move, MovesLog, SearchBudget, SearchOutcome,
    SearchStats, SearchStatus, Solution, Solver, SolverConfig, StepLimit, Strategy, Technique,
    Unbounded, Uniqueness,
};
