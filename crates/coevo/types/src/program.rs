use crate::ids::ProgramId;
use crate::population::Individual;
use serde::{Deserialize, Serialize};

/// A candidate logic encoding of the problem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateProgram {
    id: ProgramId,
    text: String,
    /// Fraction of tests answered correctly [0.0, 1.0].
    pub logic_fitness: f64,
    /// Fraction of tests that at least executed [0.0, 1.0].
    pub vocab_fitness: f64,
    /// Diagnostics collected during the latest evaluation pass.
    pub error_log: Vec<String>,
}

impl CandidateProgram {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ProgramId::new(),
            text: text.into(),
            logic_fitness: 0.0,
            vocab_fitness: 0.0,
            error_log: Vec::new(),
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn set_fitness(&mut self, logic: f64, vocab: f64) {
        self.logic_fitness = logic.clamp(0.0, 1.0);
        self.vocab_fitness = vocab.clamp(0.0, 1.0);
    }
}

impl Individual for CandidateProgram {
    type Id = ProgramId;

    fn id(&self) -> ProgramId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn replace_text(&mut self, text: String) {
        self.text = text;
    }

    fn error_log_mut(&mut self) -> &mut Vec<String> {
        &mut self.error_log
    }
}
