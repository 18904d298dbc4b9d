//! Basic example of using the Binairo engine

use binairo_core::{Grid, Solver};

fn main() {
    // Parse a puzzle from a string
    let puzzle = match Grid::from_string("..0.../..0..1/1...0./....../1.00../....11") {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Bad puzzle: {}", e);
            return;
        }
    };

    println!("Puzzle:");
    println!("{}", puzzle);

    // Show some stats
    println!("Given cells: {}", puzzle.given_count());
    println!("Empty cells: {}", puzzle.empty_count());

    // Get a hint for the original puzzle
    let solver = Solver::new();
    println!("\nGetting a hint for the original puzzle:");
    if let Some(hint) = solver.hint(&puzzle) {
        println!("Technique: {}", hint.technique);
        println!("Explanation: {}", hint.explanation);
    }

    // Solve it
    println!("\nSolving...\n");
    let mut grid = puzzle.clone();
    let solution = solver.solve(&mut grid);
    if solution.solved {
        println!("Solution ({:?}, {:?}):", solution.strategy, solution.uniqueness);
        println!("{}", grid);
        for mv in solution.moves.iter().take(5) {
            println!("  {}", mv);
        }
    } else {
        println!("No solution found");
    }

    // An empty board has many completions
    println!("\n--- Counting solutions ---\n");
    if let Ok(empty) = Grid::new(4) {
        println!("Solutions of an empty 4x4 grid: {:?}", solver.count_solutions(&empty, 100));
    }
}
