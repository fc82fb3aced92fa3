use crate::scoring::{confidence, discrimination, pass_fraction};
use crate::sink::{MetricsRecord, MetricsSink, NullMetricsSink};
use coevo_oracle::ExecutionOracle;
use coevo_types::{
    CandidateProgram, CandidateTest, ExecutionResult, FitnessMatrix, Individual, MatrixLayer,
    Population,
};
use std::sync::Arc;

const UNKNOWN_DETAIL: &str = "(unknown)";

/// Runs the full program x test cross product and assigns fitness.
pub struct FitnessEvaluator {
    oracle: Arc<dyn ExecutionOracle>,
    sink: Arc<dyn MetricsSink>,
}

impl FitnessEvaluator {
    pub fn new(oracle: Arc<dyn ExecutionOracle>) -> Self {
        Self {
            oracle,
            sink: Arc::new(NullMetricsSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Evaluate the current population snapshot.
    ///
    /// Programs with empty text are removed first. Every oracle call completes
    /// before any fitness field is written; a failed call becomes an
    /// `OTHER_FAIL` cell. An empty program population yields an empty matrix.
    pub async fn evaluate(
        &self,
        programs: &mut Population<CandidateProgram>,
        tests: &mut Population<CandidateTest>,
        scope: &str,
    ) -> FitnessMatrix {
        let dropped = programs.retain(CandidateProgram::has_text);
        if dropped > 0 {
            tracing::debug!(scope, dropped, "dropped programs with empty text");
        }

        let mut rows = Vec::with_capacity(programs.len());
        for program in programs.iter() {
            let mut row = Vec::with_capacity(tests.len());
            for test in tests.iter() {
                let result = self.run_pair(program.text(), test.query()).await;
                tracing::debug!(
                    scope,
                    program_id = %program.id(),
                    test_id = %test.id(),
                    outcome = %result.outcome,
                    "executed"
                );
                row.push(result);
            }
            rows.push(row);
        }

        let matrix = FitnessMatrix::from_results(rows, tests.len());
        apply_matrix(&matrix, programs, tests);

        for program in programs.iter() {
            self.sink.record(MetricsRecord::new(
                scope,
                program.id(),
                program.logic_fitness,
                program.vocab_fitness,
            ));
        }
        tracing::debug!(
            scope,
            programs = programs.len(),
            tests = tests.len(),
            "evaluation pass complete"
        );
        matrix
    }

    async fn run_pair(&self, program: &str, query: &str) -> ExecutionResult {
        if program.trim().is_empty() || query.trim().is_empty() {
            return ExecutionResult::other_fail("empty program or test text");
        }
        match self.oracle.execute(program, query).await {
            Ok(result) => result,
            Err(e) => ExecutionResult::other_fail(e.to_string()),
        }
    }
}

fn clear_error_logs<T: Individual>(population: &mut Population<T>) {
    for member in population.iter_mut() {
        member.error_log_mut().clear();
    }
}

/// Write the fitness implied by `matrix` onto both populations.
///
/// Rows and columns of `matrix` must line up with the populations in order.
/// Error logs are reset, then every `VOCAB_FAIL`/`OTHER_FAIL` cell appends its
/// detail to both the program's and the test's log.
pub fn apply_matrix(
    matrix: &FitnessMatrix,
    programs: &mut Population<CandidateProgram>,
    tests: &mut Population<CandidateTest>,
) {
    let n_prog = programs.len();
    let n_test = tests.len();

    clear_error_logs(programs);
    clear_error_logs(tests);

    for i in 0..n_prog {
        for j in 0..n_test {
            if matrix.cell(MatrixLayer::Vocab, i, j) {
                continue;
            }
            let detail = matrix.detail(i, j).unwrap_or(UNKNOWN_DETAIL).to_string();
            if let Some(test) = tests.get_mut(j) {
                test.error_log.push(detail.clone());
            }
            if let Some(program) = programs.get_mut(i) {
                program.error_log.push(detail);
            }
        }
    }

    for (i, program) in programs.iter_mut().enumerate() {
        let logic = pass_fraction(matrix.row_passes(MatrixLayer::Logic, i), n_test);
        let vocab = pass_fraction(matrix.row_passes(MatrixLayer::Vocab, i), n_test);
        program.set_fitness(logic, vocab);
    }

    let weights: Vec<f64> = programs.iter().map(|p| p.logic_fitness).collect();
    for (j, test) in tests.iter_mut().enumerate() {
        let logic_passes = matrix.column_passes(MatrixLayer::Logic, j);
        let vocab_passes = matrix.column_passes(MatrixLayer::Vocab, j);
        test.set_fitness(
            pass_fraction(logic_passes, n_prog),
            pass_fraction(vocab_passes, n_prog),
        );
        let column: Vec<bool> = (0..n_prog)
            .map(|i| matrix.cell(MatrixLayer::Logic, i, j))
            .collect();
        test.confidence = confidence(&column, &weights);
        test.discrimination = discrimination(logic_passes, n_prog);
    }
}
