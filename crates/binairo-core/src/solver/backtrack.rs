//! Exhaustive search: one round of forced-move propagation, then depth-first
//! backtracking over a static cell order.
//!
//! Every cell the search assigns is recorded in the moves log, which doubles
//! as the trail used to put the grid back when the search fails.

use super::budget::SearchBudget;
use super::deduce::apply_forced_moves;
use super::types::{Move, MovesLog, SearchOutcome, SearchStats, SearchStatus, Technique};
use crate::rules;
use crate::{Grid, Position, DIGITS};
use log::{debug, trace, warn};
use std::time::Instant;

/// The budget refused a step.
struct Exhausted;

/// Find one completion of `grid`.
///
/// On success the grid is complete and fully valid. On any other outcome every
/// cell this call assigned is cleared again and the returned log is empty.
pub fn solve(grid: &mut Grid, budget: &mut dyn SearchBudget) -> SearchOutcome {
    let mut stats = SearchStats::default();

    if let Some(conflict) = rules::find_conflict(grid) {
        debug!("search refused: {}", conflict);
        return SearchOutcome {
            status: SearchStatus::Unsolvable,
            moves: MovesLog::new(),
            stats,
        };
    }

    let started = Instant::now();
    let mut moves = MovesLog::new();
    stats.constraint_checks += 2 * grid.empty_count() as u64;
    let propagated = apply_forced_moves(grid, &mut moves);
    stats.forced_moves = moves.len() as u64;
    stats.placements = moves.len() as u64;
    stats.propagation_time = started.elapsed();

    if let Err(conflict) = propagated {
        debug!("propagation hit a contradiction: {}", conflict);
        unwind(grid, &mut moves, 0);
        return SearchOutcome {
            status: SearchStatus::Unsolvable,
            moves,
            stats,
        };
    }
    debug!("propagation placed {} forced cells", moves.len());

    let started = Instant::now();
    let order = branching_order(grid);
    let mut search = Search {
        grid,
        budget,
        order: &order,
        moves,
        stats,
    };
    let result = search.descend(0);
    let Search {
        grid,
        mut moves,
        mut stats,
        ..
    } = search;
    stats.search_time = started.elapsed();

    let status = match result {
        Ok(true) => SearchStatus::Solved,
        Ok(false) => SearchStatus::Unsolvable,
        Err(Exhausted) => {
            warn!(
                "search budget exhausted after {} backtracks",
                stats.backtrack_attempts
            );
            SearchStatus::BudgetExhausted
        }
    };
    if status != SearchStatus::Solved {
        // Search cells were cleared while unwinding; only propagation remains
        unwind(grid, &mut moves, 0);
    }

    debug!(
        "search finished: {:?} placements={} backtracks={} checks={}",
        status, stats.placements, stats.backtrack_attempts, stats.constraint_checks
    );
    SearchOutcome {
        status,
        moves,
        stats,
    }
}

/// Count completions of `grid`, stopping once `limit` is reached.
///
/// Returns `min(count, limit)`, or `None` if the budget ran out first. The grid
/// is left exactly as it was passed in.
pub fn count_solutions(
    grid: &mut Grid,
    limit: usize,
    budget: &mut dyn SearchBudget,
) -> Option<usize> {
    if limit == 0 {
        return Some(0);
    }
    if rules::find_conflict(grid).is_some() {
        return Some(0);
    }

    let order = branching_order(grid);
    let mut count = 0;
    match count_from(grid, &order, 0, limit, &mut count, budget) {
        Ok(()) => {
            trace!("counted {} solutions (limit {})", count, limit);
            Some(count)
        }
        Err(Exhausted) => {
            warn!("solution count abandoned at {} (limit {})", count, limit);
            None
        }
    }
}

/// Empty cells ordered by how many digits currently fit there.
///
/// Computed once; ties keep row-major order.
pub fn branching_order(grid: &Grid) -> Vec<Position> {
    let mut order: Vec<(usize, Position)> = grid
        .empty_positions()
        .into_iter()
        .map(|pos| {
            let fits = DIGITS
                .iter()
                .filter(|&&v| rules::placement_valid(grid, pos, v))
                .count();
            (fits, pos)
        })
        .collect();
    order.sort_by_key(|&(fits, _)| fits);
    order.into_iter().map(|(_, pos)| pos).collect()
}

fn unwind(grid: &mut Grid, moves: &mut MovesLog, keep: usize) {
    for m in moves.drain(keep..).rev() {
        grid.clear(m.pos);
    }
}

struct Search<'a> {
    grid: &'a mut Grid,
    budget: &'a mut dyn SearchBudget,
    order: &'a [Position],
    moves: MovesLog,
    stats: SearchStats,
}

impl Search<'_> {
    fn descend(&mut self, depth: usize) -> Result<bool, Exhausted> {
        if !self.budget.allow_step() {
            return Err(Exhausted);
        }
        let Some(&pos) = self.order.get(depth) else {
            return Ok(rules::is_fully_valid(self.grid));
        };
        if depth > 0 && depth % self.grid.size() == 0 {
            trace!("search depth {} of {}", depth, self.order.len());
        }

        for value in DIGITS {
            self.stats.constraint_checks += 1;
            if !rules::placement_valid(self.grid, pos, value) {
                continue;
            }
            self.grid.set(pos, value);
            self.moves.push(Move::new(pos, value, Technique::Search));
            self.stats.placements += 1;

            let result = self.descend(depth + 1);
            if let Ok(true) = result {
                return result;
            }
            self.grid.clear(pos);
            self.moves.pop();
            result?;
            self.stats.backtrack_attempts += 1;
        }

        Ok(false)
    }
}

fn count_from(
    grid: &mut Grid,
    order: &[Position],
    depth: usize,
    limit: usize,
    count: &mut usize,
    budget: &mut dyn SearchBudget,
) -> Result<(), Exhausted> {
    if !budget.allow_step() {
        return Err(Exhausted);
    }
    let Some(&pos) = order.get(depth) else {
        if rules::is_fully_valid(grid) {
            *count += 1;
        }
        return Ok(());
    };

    for value in DIGITS {
        if *count >= limit {
            break;
        }
        if !rules::placement_valid(grid, pos, value) {
            continue;
        }
        grid.set(pos, value);
        let result = count_from(grid, order, depth + 1, limit, count, budget);
        grid.clear(pos);
        result?;
    }

    Ok(())
}
