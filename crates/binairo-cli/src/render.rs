//! Text output: grids, status lines, metrics and move lists.

use crate::theme::Theme;
use binairo_core::{Cell, Grid, Move, Position, SearchStats, Technique};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::collections::HashMap;
use std::io::{self, Write};

/// Writes report output, colored unless disabled.
pub struct Painter {
    theme: Theme,
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self {
            theme: Theme::default(),
            color,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn paint<W: Write>(&self, out: &mut W, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            write!(out, "{}", text)
        }
    }

    pub fn line<W: Write>(&self, out: &mut W, color: Color, text: &str) -> io::Result<()> {
        self.paint(out, color, text)?;
        writeln!(out)
    }

    /// `✓ text` or `✗ text`.
    pub fn status<W: Write>(&self, out: &mut W, ok: bool, text: &str) -> io::Result<()> {
        if ok {
            self.line(out, self.theme.success, &format!("✓ {}", text))
        } else {
            self.line(out, self.theme.error, &format!("✗ {}", text))
        }
    }

    /// Draw `grid` with column letters and row numbers.
    ///
    /// Cells named in `moves` are colored by the technique that filled them;
    /// every other filled cell is a clue.
    pub fn grid<W: Write>(&self, out: &mut W, grid: &Grid, moves: &[Move]) -> io::Result<()> {
        let origin: HashMap<Position, Technique> =
            moves.iter().map(|m| (m.pos, m.technique)).collect();
        let n = grid.size();

        let header: Vec<String> = (0..n)
            .map(|col| Position::new(0, col).col_letter().to_string())
            .collect();
        self.line(out, self.theme.border, &format!("    {}", header.join(" ")))?;
        self.line(out, self.theme.border, &format!("   +{}", "-".repeat(2 * n)))?;

        for row in 0..n {
            self.paint(out, self.theme.border, &format!("{:>2} |", row + 1))?;
            for col in 0..n {
                let pos = Position::new(row, col);
                let cell = grid.get(pos);
                let color = match (cell, origin.get(&pos)) {
                    (Cell::Empty, _) => self.theme.empty,
                    (_, Some(Technique::Search)) => self.theme.searched,
                    (_, Some(_)) => self.theme.deduced,
                    (_, None) => self.theme.given,
                };
                self.paint(out, color, &format!("{} ", cell))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// One-line summary followed by the detailed counters.
    pub fn metrics<W: Write>(&self, out: &mut W, stats: &SearchStats) -> io::Result<()> {
        let total = stats.total_time().as_secs_f64();
        let share = |part: f64| if total > 0.0 { part / total * 100.0 } else { 0.0 };
        let propagation = stats.propagation_time.as_secs_f64();
        let search = stats.search_time.as_secs_f64();

        self.line(
            out,
            self.theme.info,
            &format!(
                "Solved in {:.3}s with {} backtracking attempts",
                total, stats.backtrack_attempts
            ),
        )?;
        let lines = [
            format!("Total solving time: {:.3}s", total),
            format!(
                "├─ Constraint propagation: {:.3}s ({:.1}%)",
                propagation,
                share(propagation)
            ),
            format!("└─ Backtracking: {:.3}s ({:.1}%)", search, share(search)),
            format!("Backtracking attempts: {}", stats.backtrack_attempts),
            format!("Forced moves found: {}", stats.forced_moves),
            format!("Constraint checks: {}", stats.constraint_checks),
            format!("Cell placements: {}", stats.placements),
        ];
        for text in lines {
            self.line(out, self.theme.info, &text)?;
        }
        Ok(())
    }

    /// Numbered move list.
    pub fn moves<W: Write>(&self, out: &mut W, moves: &[Move]) -> io::Result<()> {
        for (i, mv) in moves.iter().enumerate() {
            let color = if mv.technique == Technique::Search {
                self.theme.searched
            } else {
                self.theme.deduced
            };
            self.line(out, color, &format!("  {:>2}. {}", i + 1, mv))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Painter {
        Painter::new(false)
    }

    #[test]
    fn test_plain_grid_layout() {
        let grid = Grid::from_string("0./.1").unwrap();
        let mut out = Vec::new();
        plain().grid(&mut out, &grid, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "    A B\n   +----\n 1 |0 . \n 2 |. 1 \n");
    }

    #[test]
    fn test_colored_output_has_escapes() {
        let grid = Grid::from_string("0./.1").unwrap();
        let mut out = Vec::new();
        Painter::new(true).grid(&mut out, &grid, &[]).unwrap();
        assert!(out.contains(&0x1b));
    }

    #[test]
    fn test_move_list_keeps_tags() {
        let moves = vec![
            Move::new(Position::new(0, 1), Cell::One, Technique::AvoidThree),
            Move::new(Position::new(1, 0), Cell::Zero, Technique::Search),
        ];
        let mut out = Vec::new();
        plain().moves(&mut out, &moves).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "   1. Set (B,1) = 1 [AvoidThree]\n   2. Set (A,2) = 0 [Search]\n"
        );
    }

    #[test]
    fn test_metrics_without_time() {
        let mut out = Vec::new();
        plain().metrics(&mut out, &SearchStats::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Solved in 0.000s with 0 backtracking attempts\n"));
        assert!(text.contains("(0.0%)"));
    }
}
