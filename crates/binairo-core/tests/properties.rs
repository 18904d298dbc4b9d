use binairo_core::rules::{find_conflict, is_fully_valid};
use binairo_core::solver::{backtrack, deduce};
use binairo_core::{Cell, Grid, Position, SearchStatus, StepLimit, Technique, Unbounded};
use proptest::prelude::*;

const SOLUTIONS: [&str; 2] = [
    "110100/010011/101100/001101/110010/001011",
    "01101100/10110100/01001011/10010011/10101100/01010101/11001010/00110011",
];

/// A known solution with the cells picked by `mask` blanked out.
fn blanked(solution: &Grid, mask: &[bool]) -> Grid {
    let mut grid = solution.clone();
    for (pos, &blank) in solution.positions().zip(mask) {
        if blank {
            grid.clear(pos);
        }
    }
    grid
}

fn puzzle_strategy() -> impl Strategy<Value = (Grid, Grid)> {
    (0..SOLUTIONS.len(), 0.2f64..0.7).prop_flat_map(|(which, density)| {
        let solution = Grid::from_string(SOLUTIONS[which]).unwrap();
        let cells = solution.size() * solution.size();
        prop::collection::vec(prop::bool::weighted(density), cells)
            .prop_map(move |mask| (solution.clone(), blanked(&solution, &mask)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deductive_moves_agree_with_solution((solution, puzzle) in puzzle_strategy()) {
        let mut grid = puzzle.clone();
        let result = deduce::deduce(&mut grid);
        prop_assert!(result.contradiction.is_none());
        for mv in &result.moves {
            prop_assert_ne!(mv.technique, Technique::Search);
            prop_assert_eq!(mv.value, solution.get(mv.pos), "{} contradicts the solution", mv);
        }
        if result.solved {
            prop_assert_eq!(&grid, &solution);
        }
    }

    #[test]
    fn search_completes_to_valid_grid((_solution, puzzle) in puzzle_strategy()) {
        let mut grid = puzzle.clone();
        let outcome = backtrack::solve(&mut grid, &mut Unbounded);
        prop_assert!(outcome.solved());
        prop_assert!(is_fully_valid(&grid));
        prop_assert_eq!(outcome.moves.len(), puzzle.empty_count());
        for mv in &outcome.moves {
            prop_assert_eq!(puzzle.get(mv.pos), Cell::Empty);
        }
    }

    #[test]
    fn failed_search_leaves_grid_unchanged(
        (_solution, puzzle) in puzzle_strategy(),
        flip in 0usize..64,
        steps in 0u64..40,
    ) {
        // Flipping a clue usually leaves no completion
        let mut puzzle = puzzle;
        let n = puzzle.size();
        let pos = Position::new((flip / n) % n, flip % n);
        let cell = puzzle.get(pos);
        if cell.is_filled() {
            puzzle.set(pos, cell.opposite());
        }

        let mut grid = puzzle.clone();
        let outcome = backtrack::solve(&mut grid, &mut Unbounded);
        if outcome.solved() {
            prop_assert!(is_fully_valid(&grid));
        } else {
            prop_assert_eq!(outcome.status, SearchStatus::Unsolvable);
            prop_assert!(outcome.moves.is_empty());
            prop_assert_eq!(&grid, &puzzle);
        }

        let mut grid = puzzle.clone();
        let outcome = backtrack::solve(&mut grid, &mut StepLimit::new(steps));
        if !outcome.solved() {
            prop_assert_eq!(&grid, &puzzle);
        }
    }

    #[test]
    fn counting_restores_and_finds_solution((solution, puzzle) in puzzle_strategy()) {
        let mut grid = puzzle.clone();
        let count = backtrack::count_solutions(&mut grid, 2, &mut Unbounded);
        prop_assert_eq!(&grid, &puzzle);
        prop_assert!(matches!(count, Some(1) | Some(2)));
        prop_assert!(find_conflict(&solution).is_none());
    }
}
