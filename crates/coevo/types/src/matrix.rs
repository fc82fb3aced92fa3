use crate::outcome::ExecutionResult;
use serde::{Deserialize, Serialize};

/// Which boolean layer of the fitness matrix to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixLayer {
    /// 1 = query executed and returned the expected outcome.
    Logic,
    /// 1 = query executed, regardless of correctness.
    Vocab,
}

/// Per-program and per-test pass rates over one matrix layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassRates {
    pub programs: Vec<f64>,
    pub tests: Vec<f64>,
}

impl PassRates {
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty() || self.tests.is_empty()
    }

    /// Every program and every test is at or above `threshold`.
    pub fn all_at_least(&self, threshold: f64) -> bool {
        self.programs.iter().all(|r| *r >= threshold) && self.tests.iter().all(|r| *r >= threshold)
    }
}

/// Pass rates of a `[program][test]` 0/1 matrix.
///
/// An empty matrix, or one without columns, yields empty rates. The first
/// row sets the column count; missing cells in shorter rows count as failures.
pub fn compute_pass_rates(rows: &[Vec<bool>]) -> PassRates {
    let n_prog = rows.len();
    let n_test = rows.first().map(Vec::len).unwrap_or(0);
    if n_prog == 0 || n_test == 0 {
        return PassRates::default();
    }

    let programs = rows
        .iter()
        .map(|row| row.iter().take(n_test).filter(|c| **c).count() as f64 / n_test as f64)
        .collect();
    let tests = (0..n_test)
        .map(|j| {
            let passes = rows
                .iter()
                .filter(|row| row.get(j).copied().unwrap_or(false))
                .count();
            passes as f64 / n_prog as f64
        })
        .collect();

    PassRates { programs, tests }
}

/// Result of one full evaluation pass, indexed `[program_idx][test_idx]`.
///
/// Built only from classified execution results, so a logic pass always
/// implies a vocab pass. Rebuilt wholesale on every pass, never patched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FitnessMatrix {
    logic: Vec<Vec<bool>>,
    vocab: Vec<Vec<bool>>,
    details: Vec<Vec<Option<String>>>,
    test_count: usize,
}

impl FitnessMatrix {
    /// Build from one row of results per program. Rows are fitted to
    /// `test_count`: extra results are dropped and missing ones become failed
    /// cells without detail.
    pub fn from_results(rows: Vec<Vec<ExecutionResult>>, test_count: usize) -> Self {
        let mut logic = Vec::with_capacity(rows.len());
        let mut vocab = Vec::with_capacity(rows.len());
        let mut details = Vec::with_capacity(rows.len());

        for mut row in rows {
            row.truncate(test_count);
            let mut l: Vec<bool> = row.iter().map(|r| r.outcome.is_logic_pass()).collect();
            let mut v: Vec<bool> = row.iter().map(|r| r.outcome.is_vocab_pass()).collect();
            let mut d: Vec<Option<String>> = row.into_iter().map(|r| r.detail).collect();
            l.resize(test_count, false);
            v.resize(test_count, false);
            d.resize(test_count, None);
            logic.push(l);
            vocab.push(v);
            details.push(d);
        }

        Self {
            logic,
            vocab,
            details,
            test_count,
        }
    }

    pub fn program_count(&self) -> usize {
        self.logic.len()
    }

    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// No rows: nothing was evaluated.
    pub fn is_empty(&self) -> bool {
        self.logic.is_empty()
    }

    pub fn logic_matrix(&self) -> &[Vec<bool>] {
        &self.logic
    }

    pub fn vocab_matrix(&self) -> &[Vec<bool>] {
        &self.vocab
    }

    pub fn layer(&self, layer: MatrixLayer) -> &[Vec<bool>] {
        match layer {
            MatrixLayer::Logic => &self.logic,
            MatrixLayer::Vocab => &self.vocab,
        }
    }

    pub fn cell(&self, layer: MatrixLayer, program_idx: usize, test_idx: usize) -> bool {
        self.layer(layer)
            .get(program_idx)
            .and_then(|row| row.get(test_idx))
            .copied()
            .unwrap_or(false)
    }

    pub fn detail(&self, program_idx: usize, test_idx: usize) -> Option<&str> {
        self.details
            .get(program_idx)
            .and_then(|row| row.get(test_idx))
            .and_then(|d| d.as_deref())
    }

    pub fn pass_rates(&self, layer: MatrixLayer) -> PassRates {
        compute_pass_rates(self.layer(layer))
    }

    /// Number of programs passing test `test_idx`.
    pub fn column_passes(&self, layer: MatrixLayer, test_idx: usize) -> usize {
        self.layer(layer)
            .iter()
            .filter(|row| row.get(test_idx).copied().unwrap_or(false))
            .count()
    }

    /// Number of tests program `program_idx` passes.
    pub fn row_passes(&self, layer: MatrixLayer, program_idx: usize) -> usize {
        self.layer(layer)
            .get(program_idx)
            .map(|row| row.iter().filter(|c| **c).count())
            .unwrap_or(0)
    }

    pub fn failing_tests(&self, layer: MatrixLayer, program_idx: usize) -> Vec<usize> {
        self.row_indices(layer, program_idx, false)
    }

    pub fn passing_tests(&self, layer: MatrixLayer, program_idx: usize) -> Vec<usize> {
        self.row_indices(layer, program_idx, true)
    }

    pub fn failing_programs(&self, layer: MatrixLayer, test_idx: usize) -> Vec<usize> {
        self.layer(layer)
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.get(test_idx).copied().unwrap_or(false))
            .map(|(i, _)| i)
            .collect()
    }

    fn row_indices(&self, layer: MatrixLayer, program_idx: usize, wanted: bool) -> Vec<usize> {
        self.layer(layer)
            .get(program_idx)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, c)| **c == wanted)
                    .map(|(j, _)| j)
                    .collect()
            })
            .unwrap_or_default()
    }
}
