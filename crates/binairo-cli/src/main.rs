mod error;
mod puzzle_file;
mod render;
mod theme;
mod validate;

use binairo_core::solver::techniques_used;
use binairo_core::{
    Grid, HintType, MovesLog, SearchStats, Solver, SolverConfig, Strategy, Uniqueness,
};
use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use render::Painter;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "binairo", version, about = "Solve and check Binairo puzzles")]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Plain output without terminal colors.
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one puzzle from a puzzle file.
    Solve(SolveArgs),
    /// Show the next deduction without solving.
    Hint(HintArgs),
    /// Check puzzle files for structure, duplicates and solvability.
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Deduce, then search if the rules get stuck
    Auto,
    /// Deductive rules only
    Deductive,
    /// Backtracking search only
    Search,
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    /// Puzzle JSON file (a single puzzle or an array)
    file: PathBuf,
    /// Puzzle ID to solve when the file holds several
    #[arg(long)]
    puzzle_id: Option<u64>,
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,
    /// Maximum number of search nodes
    #[arg(long)]
    max_steps: Option<u64>,
    /// Wall-clock limit for each search, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct HintArgs {
    file: PathBuf,
    #[arg(long)]
    puzzle_id: Option<u64>,
}

#[derive(clap::Args, Debug)]
struct ValidateArgs {
    /// Puzzle JSON files
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Treat unsolvable or ambiguous puzzles as errors
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let painter = Painter::new(!cli.no_color);
    let result = match &cli.command {
        Command::Solve(args) => run_solve(args, cli.verbose > 0, &painter),
        Command::Hint(args) => run_hint(args, &painter),
        Command::Validate(args) => run_validate(args, cli.verbose > 0, &painter),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Everything `solve --json` reports
#[derive(Serialize)]
struct SolveReport {
    id: Option<u64>,
    solved: bool,
    strategy: Option<Strategy>,
    uniqueness: Uniqueness,
    grid: Grid,
    moves: MovesLog,
    stats: SearchStats,
}

fn run_solve(args: &SolveArgs, verbose: bool, painter: &Painter) -> Result<bool, CliError> {
    let (record, count) = puzzle_file::load_puzzle(&args.file, args.puzzle_id)?;
    let mut grid = record.grid()?;
    let solver = Solver::with_config(SolverConfig {
        step_limit: args.max_steps,
        time_limit: args.timeout_ms.map(Duration::from_millis),
    });

    let (solved, strategy, uniqueness, moves, stats) = match args.strategy {
        StrategyArg::Auto => {
            let s = solver.solve(&mut grid);
            (s.solved, s.strategy, s.uniqueness, s.moves, s.stats)
        }
        StrategyArg::Deductive => {
            let d = solver.solve_deductive(&mut grid);
            let uniqueness = match (d.solved, &d.contradiction) {
                (true, _) => Uniqueness::Unique,
                (false, Some(_)) => Uniqueness::NoSolution,
                (false, None) => Uniqueness::Unknown,
            };
            let strategy = d.solved.then_some(Strategy::Deductive);
            (d.solved, strategy, uniqueness, d.moves, SearchStats::default())
        }
        StrategyArg::Search => {
            let clues = grid.clone();
            let o = solver.solve_search(&mut grid);
            let uniqueness = if o.solved() {
                solver.verify_unique(&clues)
            } else {
                Uniqueness::Unknown
            };
            let strategy = o.solved().then_some(Strategy::Search);
            (o.solved(), strategy, uniqueness, o.moves, o.stats)
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let report = SolveReport {
            id: record.id,
            solved,
            strategy,
            uniqueness,
            grid,
            moves,
            stats,
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(solved);
    }

    if count > 1 && args.puzzle_id.is_none() {
        writeln!(
            out,
            "File contains {} puzzles. Using first puzzle (ID: {}).",
            count,
            record.label()
        )?;
        writeln!(out, "Use --puzzle-id to select a specific puzzle.")?;
    }
    writeln!(out, "Puzzle ID: {}", record.label())?;
    writeln!(out, "Size: {}", record.size.as_deref().unwrap_or("Unknown"))?;
    writeln!(
        out,
        "Difficulty: {}",
        record.difficulty.as_deref().unwrap_or("Unknown")
    )?;
    writeln!(out, "Source ID: {}", record.puzzle_id.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "\nInitial Grid:")?;
    painter.grid(&mut out, &record.grid()?, &[])?;

    writeln!(out, "\nVerifying solution uniqueness...")?;
    match solver.count_solutions(&record.grid()?, 3) {
        Some(0) => {
            painter.status(&mut out, false, "No solutions exist")?;
            return Ok(false);
        }
        Some(1) => painter.status(&mut out, true, "Exactly one solution exists")?,
        Some(n) => {
            painter.line(
                &mut out,
                painter.theme().warning,
                &format!("Multiple solutions exist (found at least {})", n),
            )?;
            return Ok(false);
        }
        None => painter.line(
            &mut out,
            painter.theme().warning,
            "Could not count solutions within the search limits",
        )?,
    }

    writeln!(out)?;
    if solved {
        painter.status(&mut out, true, "Puzzle solved successfully!")?;
        painter.metrics(&mut out, &stats)?;
        writeln!(out, "\nFinal Grid:")?;
        painter.grid(&mut out, &grid, &moves)?;
        if verbose {
            let used: Vec<String> = techniques_used(&moves).iter().map(|t| t.to_string()).collect();
            writeln!(out, "\nTotal moves: {}", moves.len())?;
            writeln!(out, "Techniques used: {}", used.join(", "))?;
            writeln!(out, "\nMove sequence:")?;
            painter.moves(&mut out, &moves)?;
        }
    } else {
        painter.status(&mut out, false, "Could not solve puzzle")?;
        writeln!(out, "Final state:")?;
        painter.grid(&mut out, &grid, &moves)?;
        if verbose && !moves.is_empty() {
            writeln!(out, "\nProgress made ({} moves):", moves.len())?;
            painter.moves(&mut out, &moves[moves.len().saturating_sub(5)..])?;
        }
    }

    Ok(solved)
}

fn run_hint(args: &HintArgs, painter: &Painter) -> Result<bool, CliError> {
    let (record, _) = puzzle_file::load_puzzle(&args.file, args.puzzle_id)?;
    let grid = record.grid()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    painter.grid(&mut out, &grid, &[])?;
    let Some(hint) = Solver::new().hint(&grid) else {
        painter.status(&mut out, false, "No hint available")?;
        return Ok(false);
    };

    let HintType::SetValue { pos, value } = hint.hint_type;
    writeln!(out)?;
    painter.line(
        &mut out,
        painter.theme().success,
        &format!("Set {} = {} [{}]", pos, value, hint.technique),
    )?;
    writeln!(out, "{}", hint.explanation)?;
    if !hint.involved_cells.is_empty() {
        let cells: Vec<String> = hint.involved_cells.iter().map(|p| p.to_string()).collect();
        painter.line(
            &mut out,
            painter.theme().info,
            &format!("Because of: {}", cells.join(" ")),
        )?;
    }
    Ok(true)
}

fn run_validate(args: &ValidateArgs, verbose: bool, painter: &Painter) -> Result<bool, CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut validator = validate::Validator::new(args.strict);

    let mut files = args.files.clone();
    files.sort();
    writeln!(out, "Validating {} file(s)...", files.len())?;

    let reports: Vec<validate::FileReport> =
        files.iter().map(|f| validator.validate_file(f)).collect();
    let single = reports.len() == 1;
    for report in &reports {
        validate::print_report(&mut out, painter, report, verbose || single)?;
    }
    if !single {
        validate::print_summary(&mut out, &reports)?;
    }

    Ok(reports.iter().all(|r| r.valid))
}
