use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of one program × test execution.
///
/// The four kinds are exhaustive and mutually exclusive; consumers match on
/// them explicitly so a new kind cannot fall through a default branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Query executed and produced the expected result.
    Pass,
    /// Query executed but produced the wrong result.
    LogicFail,
    /// Naming, arity or syntax mismatch between program and query.
    VocabFail,
    /// Timeout, oracle failure or malformed input.
    OtherFail,
}

impl Outcome {
    /// Counts towards the logic matrix.
    pub fn is_logic_pass(self) -> bool {
        match self {
            Outcome::Pass => true,
            Outcome::LogicFail | Outcome::VocabFail | Outcome::OtherFail => false,
        }
    }

    /// Counts towards the vocab matrix: the query at least executed.
    pub fn is_vocab_pass(self) -> bool {
        match self {
            Outcome::Pass | Outcome::LogicFail => true,
            Outcome::VocabFail | Outcome::OtherFail => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Pass => "PASS",
            Outcome::LogicFail => "LOGIC_FAIL",
            Outcome::VocabFail => "VOCAB_FAIL",
            Outcome::OtherFail => "OTHER_FAIL",
        };
        f.write_str(s)
    }
}

/// Outcome of a single execution together with the oracle's diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub outcome: Outcome,
    pub detail: Option<String>,
}

impl ExecutionResult {
    pub fn new(outcome: Outcome, detail: Option<String>) -> Self {
        Self { outcome, detail }
    }

    pub fn pass() -> Self {
        Self::new(Outcome::Pass, None)
    }

    pub fn logic_fail(detail: impl Into<String>) -> Self {
        Self::new(Outcome::LogicFail, Some(detail.into()))
    }

    pub fn vocab_fail(detail: impl Into<String>) -> Self {
        Self::new(Outcome::VocabFail, Some(detail.into()))
    }

    pub fn other_fail(detail: impl Into<String>) -> Self {
        Self::new(Outcome::OtherFail, Some(detail.into()))
    }
}

/// Which of the two populations an individual belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndividualKind {
    Program,
    Test,
}

impl IndividualKind {
    pub fn other(self) -> Self {
        match self {
            IndividualKind::Program => IndividualKind::Test,
            IndividualKind::Test => IndividualKind::Program,
        }
    }
}

impl fmt::Display for IndividualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndividualKind::Program => f.write_str("program"),
            IndividualKind::Test => f.write_str("test"),
        }
    }
}
