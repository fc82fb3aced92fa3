use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured context handed to the synthesis oracle.
///
/// Rendering a request into prompt text is the backend's concern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthesisRequest {
    /// Fresh program; `reference_tests` pin predicate names and arity.
    GenerateProgram {
        problem: String,
        reference_tests: Vec<String>,
    },
    /// Batch of fresh tests, separated by `#####` lines in the response.
    GenerateTests { problem: String, count: usize },
    /// Vocabulary repair of one program, with errors it shares with failing tests.
    RepairProgram { program: String, errors: Vec<String> },
    /// Vocabulary repair of one test, with errors it shares with failing programs.
    RepairTest {
        query: String,
        errors: Vec<String>,
        fallback_program: Option<String>,
    },
    CrossoverPrograms {
        problem: String,
        parent_a: String,
        parent_b: String,
    },
    MutateProgram { problem: String, program: String },
    /// New test aimed at the current champion's weaknesses.
    TargetedTest {
        problem: String,
        champion: String,
        failing: Vec<String>,
        passing: Vec<String>,
    },
}

impl SynthesisRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            SynthesisRequest::GenerateProgram { .. } => RequestKind::GenerateProgram,
            SynthesisRequest::GenerateTests { .. } => RequestKind::GenerateTests,
            SynthesisRequest::RepairProgram { .. } => RequestKind::RepairProgram,
            SynthesisRequest::RepairTest { .. } => RequestKind::RepairTest,
            SynthesisRequest::CrossoverPrograms { .. } => RequestKind::CrossoverPrograms,
            SynthesisRequest::MutateProgram { .. } => RequestKind::MutateProgram,
            SynthesisRequest::TargetedTest { .. } => RequestKind::TargetedTest,
        }
    }
}

/// Discriminant of a [`SynthesisRequest`], for logging and fakes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    GenerateProgram,
    GenerateTests,
    RepairProgram,
    RepairTest,
    CrossoverPrograms,
    MutateProgram,
    TargetedTest,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestKind::GenerateProgram => "generate_program",
            RequestKind::GenerateTests => "generate_tests",
            RequestKind::RepairProgram => "repair_program",
            RequestKind::RepairTest => "repair_test",
            RequestKind::CrossoverPrograms => "crossover_programs",
            RequestKind::MutateProgram => "mutate_program",
            RequestKind::TargetedTest => "targeted_test",
        };
        f.write_str(s)
    }
}
