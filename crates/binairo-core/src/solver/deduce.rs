//! Deductive rules: the four inferences a human solver applies.
//!
//! Each rule fills a cell only when its value is the one consistent choice,
//! so a grid completed here has exactly one solution. Rules are applied in
//! sweeps until a sweep changes nothing.

use super::types::{Deduction, Move, MovesLog, Technique};
use crate::rules::{self, Conflict, Line};
use crate::{Cell, Grid, Position, DIGITS};
use log::{debug, trace};

/// A rule pass: applies every instance it finds, reports whether it filled
/// anything, or the contradiction that stopped it.
pub type Rule = fn(&mut Grid, &mut MovesLog) -> Result<bool, Conflict>;

/// Rules in the order a sweep applies them.
pub const RULES: [(Technique, Rule); 4] = [
    (Technique::AvoidThree, apply_avoid_three),
    (Technique::Balance, apply_balance),
    (Technique::DuplicatePrevention, apply_duplicate_prevention),
    (Technique::ForcedMove, apply_forced_moves),
];

/// Run all rules to a fixed point.
///
/// On failure the grid is left at the state where deduction got stuck so the
/// caller can inspect it or hand it to the search solver.
pub fn deduce(grid: &mut Grid) -> Deduction {
    let mut moves = MovesLog::new();

    if let Some(conflict) = rules::find_conflict(grid) {
        debug!("deduction refused: {}", conflict);
        return Deduction {
            solved: false,
            moves,
            sweeps: 0,
            contradiction: Some(conflict),
        };
    }

    let mut sweeps = 0;
    let mut contradiction = None;
    while !grid.is_complete() {
        sweeps += 1;
        let before = moves.len();
        match sweep(grid, &mut moves) {
            Ok(true) => trace!("sweep {} filled {} cells", sweeps, moves.len() - before),
            Ok(false) => break,
            Err(conflict) => {
                debug!("sweep {} hit a contradiction: {}", sweeps, conflict);
                contradiction = Some(conflict);
                break;
            }
        }
    }

    if contradiction.is_none() && grid.is_complete() {
        // Rules cannot see duplicate lines until both are full
        contradiction = rules::find_conflict(grid);
    }

    let solved = contradiction.is_none() && rules::is_fully_valid(grid);
    debug!(
        "deduction finished: solved={} moves={} sweeps={} empty={}",
        solved,
        moves.len(),
        sweeps,
        grid.empty_count()
    );

    Deduction {
        solved,
        moves,
        sweeps,
        contradiction,
    }
}

/// One pass of every rule, in order.
pub fn sweep(grid: &mut Grid, moves: &mut MovesLog) -> Result<bool, Conflict> {
    let mut progress = false;
    for (_, rule) in RULES {
        progress |= rule(grid, moves)?;
    }
    Ok(progress)
}

/// The first cell the rules would fill, without touching `grid`.
pub fn next_deduction(grid: &Grid) -> Option<Move> {
    if rules::find_conflict(grid).is_some() {
        return None;
    }
    let mut scratch = grid.clone();
    for (_, rule) in RULES {
        let mut moves = MovesLog::new();
        rule(&mut scratch, &mut moves).ok()?;
        if let Some(first) = moves.first() {
            return Some(*first);
        }
    }
    None
}

fn place(
    grid: &mut Grid,
    pos: Position,
    value: Cell,
    technique: Technique,
    moves: &mut MovesLog,
) -> Result<(), Conflict> {
    if !rules::placement_valid(grid, pos, value) {
        // The rule already excluded the other digit
        return Err(Conflict::NoCandidate { pos });
    }
    grid.set(pos, value);
    moves.push(Move::new(pos, value, technique));
    Ok(())
}

/// Two equal neighbours in a 3-window force the third cell to the other digit.
pub fn apply_avoid_three(grid: &mut Grid, moves: &mut MovesLog) -> Result<bool, Conflict> {
    let n = grid.size();
    let mut progress = false;

    for line in Line::all(n) {
        for start in 0..n.saturating_sub(2) {
            let window = [
                line.position(start),
                line.position(start + 1),
                line.position(start + 2),
            ];
            let filled: Vec<Cell> = window
                .iter()
                .map(|&p| grid.get(p))
                .filter(|c| c.is_filled())
                .collect();
            if filled.len() != 2 || filled[0] != filled[1] {
                continue;
            }
            if let Some(target) = window.iter().copied().find(|&p| grid.get(p).is_empty()) {
                place(grid, target, filled[0].opposite(), Technique::AvoidThree, moves)?;
                progress = true;
            }
        }
    }

    Ok(progress)
}

/// A line already holding half of one digit takes the other digit everywhere else.
pub fn apply_balance(grid: &mut Grid, moves: &mut MovesLog) -> Result<bool, Conflict> {
    let n = grid.size();
    let half = grid.half();
    let mut progress = false;

    for line in Line::all(n) {
        let cells = line.cells(grid);
        if cells.iter().all(|c| c.is_filled()) {
            continue;
        }
        let zeros = cells.iter().filter(|&&c| c == Cell::Zero).count();
        let ones = cells.iter().filter(|&&c| c == Cell::One).count();
        let fill = if zeros == half {
            Cell::One
        } else if ones == half {
            Cell::Zero
        } else {
            continue;
        };

        for pos in line.positions(n) {
            if grid.get(pos).is_empty() {
                place(grid, pos, fill, Technique::Balance, moves)?;
                progress = true;
            }
        }
    }

    Ok(progress)
}

/// Two lines that agree everywhere both are filled, each missing one cell at a
/// different index, take complementary digits there so they cannot end up
/// identical.
///
/// Only this single-gap case is handled.
pub fn apply_duplicate_prevention(
    grid: &mut Grid,
    moves: &mut MovesLog,
) -> Result<bool, Conflict> {
    let n = grid.size();
    let mut progress = false;

    let families: [Vec<Line>; 2] = [
        (0..n).map(Line::Row).collect(),
        (0..n).map(Line::Column).collect(),
    ];
    for lines in &families {
        for a in 0..n {
            for b in (a + 1)..n {
                let Some((pa, pb)) = single_gap_pair(grid, lines[a], lines[b]) else {
                    continue;
                };
                // Zero in the first line wins when both assignments are legal
                let choice = DIGITS.into_iter().find(|&x| {
                    rules::placement_valid(grid, pa, x)
                        && rules::placement_valid(grid, pb, x.opposite())
                });
                if let Some(x) = choice {
                    place(grid, pa, x, Technique::DuplicatePrevention, moves)?;
                    place(grid, pb, x.opposite(), Technique::DuplicatePrevention, moves)?;
                    progress = true;
                }
            }
        }
    }

    Ok(progress)
}

/// The gap positions of two lines that qualify for duplicate prevention.
pub(crate) fn single_gap_pair(grid: &Grid, a: Line, b: Line) -> Option<(Position, Position)> {
    let ca = a.cells(grid);
    let cb = b.cells(grid);
    let gap = |cells: &[Cell]| {
        let mut empties = cells.iter().enumerate().filter(|(_, c)| c.is_empty());
        match (empties.next(), empties.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    };
    let ia = gap(&ca)?;
    let ib = gap(&cb)?;
    if ia == ib {
        return None;
    }
    let agree = ca
        .iter()
        .zip(&cb)
        .all(|(x, y)| x.is_empty() || y.is_empty() || x == y);
    agree.then(|| (a.position(ia), b.position(ib)))
}

/// An empty cell where only one digit passes the local checks takes that digit.
pub fn apply_forced_moves(grid: &mut Grid, moves: &mut MovesLog) -> Result<bool, Conflict> {
    let mut progress = false;

    for pos in grid.empty_positions() {
        let candidates: Vec<Cell> = DIGITS
            .into_iter()
            .filter(|&v| rules::placement_valid(grid, pos, v))
            .collect();
        match candidates[..] {
            [] => return Err(Conflict::NoCandidate { pos }),
            [value] => {
                grid.set(pos, value);
                moves.push(Move::new(pos, value, Technique::ForcedMove));
                progress = true;
            }
            _ => {}
        }
    }

    Ok(progress)
}
