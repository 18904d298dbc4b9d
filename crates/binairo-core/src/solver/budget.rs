//! Hooks for bounding search cost.
//!
//! Backtracking is exponential in the worst case. The engine imposes no bound
//! of its own; callers pass a [`SearchBudget`] that is polled once per search
//! node and stops the search as soon as it refuses a step.

use std::time::{Duration, Instant};

/// Polled once per search node. Returning `false` aborts the search.
pub trait SearchBudget {
    fn allow_step(&mut self) -> bool;
}

/// Never refuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl SearchBudget for Unbounded {
    fn allow_step(&mut self) -> bool {
        true
    }
}

/// Allows a fixed number of search nodes.
#[derive(Debug, Clone, Copy)]
pub struct StepLimit {
    remaining: u64,
}

impl StepLimit {
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }
}

impl SearchBudget for StepLimit {
    fn allow_step(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Refuses once a wall-clock instant has passed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    until: Instant,
}

impl Deadline {
    pub fn at(until: Instant) -> Self {
        Self { until }
    }

    pub fn after(timeout: Duration) -> Self {
        Self::at(Instant::now() + timeout)
    }
}

impl SearchBudget for Deadline {
    fn allow_step(&mut self) -> bool {
        Instant::now() < self.until
    }
}

/// Step and time limits combined; built from [`SolverConfig`](super::SolverConfig).
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    steps: Option<StepLimit>,
    deadline: Option<Deadline>,
}

impl Limits {
    pub fn new(step_limit: Option<u64>, time_limit: Option<Duration>) -> Self {
        Self {
            steps: step_limit.map(StepLimit::new),
            deadline: time_limit.map(Deadline::after),
        }
    }
}

impl SearchBudget for Limits {
    fn allow_step(&mut self) -> bool {
        if let Some(steps) = self.steps.as_mut() {
            if !steps.allow_step() {
                return false;
            }
        }
        self.deadline.as_mut().map_or(true, |d| d.allow_step())
    }
}
