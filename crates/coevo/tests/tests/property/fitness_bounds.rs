//! Property tests: fitness written by an evaluation pass stays within bounds
//! and respects the logic-implies-vocab structure of the matrix.

use coevo_evaluator::apply_matrix;
use coevo_types::{
    CandidateProgram, CandidateTest, ExecutionResult, FitnessMatrix, MatrixLayer, Population,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_result() -> impl Strategy<Value = ExecutionResult> {
    prop_oneof![
        Just(ExecutionResult::pass()),
        Just(ExecutionResult::logic_fail("Predicted yes, expected no")),
        Just(ExecutionResult::vocab_fail("Unknown procedure covered_fire/0")),
        Just(ExecutionResult::other_fail("timeout")),
    ]
}

/// A `programs x tests` grid of execution results.
fn arb_grid() -> impl Strategy<Value = (usize, Vec<Vec<ExecutionResult>>)> {
    (1usize..6, 0usize..6).prop_flat_map(|(p, t)| {
        (
            Just(t),
            prop::collection::vec(prop::collection::vec(arb_result(), t), p),
        )
    })
}

fn populations(p: usize, t: usize) -> (Population<CandidateProgram>, Population<CandidateTest>) {
    let programs = (0..p).map(|i| CandidateProgram::new(format!("p{}", i)));
    let tests = (0..t).map(|j| CandidateTest::from_query(format!("q{}", j)));
    (
        Population::from_members(programs.collect()),
        Population::from_members(tests.collect()),
    )
}

fn in_unit(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Logic passes are a subset of vocab passes, cell by cell.
    #[test]
    fn logic_layer_implies_vocab_layer((t, rows) in arb_grid()) {
        let matrix = FitnessMatrix::from_results(rows, t);
        for i in 0..matrix.program_count() {
            for j in 0..matrix.test_count() {
                if matrix.cell(MatrixLayer::Logic, i, j) {
                    prop_assert!(matrix.cell(MatrixLayer::Vocab, i, j));
                }
            }
        }
    }

    /// Every fitness, confidence and discrimination value lies in [0, 1], and
    /// logic fitness never exceeds vocab fitness.
    #[test]
    fn fitness_is_bounded((t, rows) in arb_grid()) {
        let p = rows.len();
        let matrix = FitnessMatrix::from_results(rows, t);
        let (mut programs, mut tests) = populations(p, t);
        apply_matrix(&matrix, &mut programs, &mut tests);

        for prog in programs.iter() {
            prop_assert!(in_unit(prog.logic_fitness));
            prop_assert!(in_unit(prog.vocab_fitness));
            prop_assert!(prog.logic_fitness <= prog.vocab_fitness);
        }
        for test in tests.iter() {
            prop_assert!(in_unit(test.logic_fitness));
            prop_assert!(in_unit(test.vocab_fitness));
            prop_assert!(in_unit(test.confidence));
            prop_assert!(in_unit(test.discrimination));
            prop_assert!(test.logic_fitness <= test.vocab_fitness);
        }
    }

    /// With no tests every program scores zero instead of dividing by zero.
    #[test]
    fn empty_test_set_scores_zero(p in 1usize..6) {
        let matrix = FitnessMatrix::from_results(vec![Vec::new(); p], 0);
        let (mut programs, mut tests) = populations(p, 0);
        apply_matrix(&matrix, &mut programs, &mut tests);
        for prog in programs.iter() {
            prop_assert_eq!(prog.logic_fitness, 0.0);
            prop_assert_eq!(prog.vocab_fitness, 0.0);
        }
    }

    /// A test everyone passes, or nobody passes, cannot discriminate.
    #[test]
    fn unanimous_tests_have_zero_discrimination((t, rows) in arb_grid()) {
        let p = rows.len();
        let matrix = FitnessMatrix::from_results(rows, t);
        let (mut programs, mut tests) = populations(p, t);
        apply_matrix(&matrix, &mut programs, &mut tests);

        for (j, test) in tests.iter().enumerate() {
            let passes = matrix.column_passes(MatrixLayer::Logic, j);
            if passes == 0 || passes == p {
                prop_assert_eq!(test.discrimination, 0.0);
            } else {
                prop_assert!(test.discrimination > 0.0);
            }
        }
    }

    /// Each non-vocab-pass cell leaves one entry in both error logs.
    #[test]
    fn error_logs_count_failed_cells((t, rows) in arb_grid()) {
        let p = rows.len();
        let matrix = FitnessMatrix::from_results(rows, t);
        let (mut programs, mut tests) = populations(p, t);
        apply_matrix(&matrix, &mut programs, &mut tests);

        for (i, prog) in programs.iter().enumerate() {
            let failed = t - matrix.row_passes(MatrixLayer::Vocab, i);
            prop_assert_eq!(prog.error_log.len(), failed);
        }
        for (j, test) in tests.iter().enumerate() {
            let failed = p - matrix.column_passes(MatrixLayer::Vocab, j);
            prop_assert_eq!(test.error_log.len(), failed);
        }
    }
}
