use crate::block::parse_gold_label;
use crate::ids::TestId;
use crate::population::Individual;
use serde::{Deserialize, Serialize};

/// A machine-checkable query probing the candidate programs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateTest {
    id: TestId,
    query: String,
    gold_label: Option<String>,
    /// Fraction of programs answering this test correctly.
    pub logic_fitness: f64,
    /// Fraction of programs this test executes against.
    pub vocab_fitness: f64,
    /// Pass rate weighted by the logic fitness of the passing programs.
    pub confidence: f64,
    /// Binary entropy of the logic pass rate.
    pub discrimination: f64,
    pub error_log: Vec<String>,
}

impl CandidateTest {
    /// Build a test from query text, deriving the gold label from a starred option line.
    pub fn from_query(query: impl Into<String>) -> Self {
        let query = query.into();
        let gold_label = parse_gold_label(&query);
        Self {
            id: TestId::new(),
            query,
            gold_label,
            logic_fitness: 0.0,
            vocab_fitness: 0.0,
            confidence: 0.0,
            discrimination: 0.0,
            error_log: Vec::new(),
        }
    }

    pub fn id(&self) -> TestId {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Expected answer, as marked in the query text.
    pub fn gold_label(&self) -> Option<&str> {
        self.gold_label.as_deref()
    }

    /// Overwrite the query and re-derive the gold label from the new text.
    pub fn replace_query(&mut self, query: String) {
        self.gold_label = parse_gold_label(&query);
        self.query = query;
    }

    pub fn set_fitness(&mut self, logic: f64, vocab: f64) {
        self.logic_fitness = logic.clamp(0.0, 1.0);
        self.vocab_fitness = vocab.clamp(0.0, 1.0);
    }

    /// Scalar fitness used by strict Pareto fill and the above-average filter.
    pub fn combined_fitness(&self) -> f64 {
        0.5 * self.confidence + 0.5 * self.discrimination
    }
}

impl Individual for CandidateTest {
    type Id = TestId;

    fn id(&self) -> TestId {
        self.id
    }

    fn text(&self) -> &str {
        &self.query
    }

    fn replace_text(&mut self, text: String) {
        self.replace_query(text);
    }

    fn error_log_mut(&mut self) -> &mut Vec<String> {
        &mut self.error_log
    }
}
