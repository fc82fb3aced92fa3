//! Helpers for execution backends that turn raw solver output into outcomes.

use coevo_types::ExecutionResult;

/// Diagnostic fragments that indicate a naming, arity or syntax mismatch.
pub const DEFAULT_VOCAB_PATTERNS: &[&str] = &[
    "Unknown procedure",
    "Undefined procedure",
    "ERROR: ",
    "Singleton variables",
    "syntax error",
    "SyntaxError",
    "parse error",
    "undeclared",
    "NameError",
    "unknown constant",
    "unknown function",
];

/// Maps solver diagnostics of a failed run to `VOCAB_FAIL` or `LOGIC_FAIL`.
#[derive(Clone, Debug)]
pub struct OutcomeClassifier {
    /// Lowercased patterns, matched as substrings.
    patterns: Vec<String>,
}

impl OutcomeClassifier {
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_VOCAB_PATTERNS
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Classifier with no patterns: every failure is a logic failure.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl AsRef<str>) -> Self {
        self.patterns.push(pattern.as_ref().to_lowercase());
        self
    }

    pub fn is_vocab_error(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        self.patterns.iter().any(|p| lowered.contains(p.as_str()))
    }

    /// Classify a run that did not succeed.
    pub fn classify_failure(&self, message: Option<&str>) -> ExecutionResult {
        match message {
            Some(msg) if self.is_vocab_error(msg) => ExecutionResult::vocab_fail(msg),
            Some(msg) => ExecutionResult::logic_fail(msg),
            None => ExecutionResult::logic_fail("(unknown)"),
        }
    }
}

impl Default for OutcomeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare a predicted answer to the gold label of a test.
pub fn judge_prediction(predicted: &str, gold: Option<&str>) -> ExecutionResult {
    let predicted = predicted.trim();
    match gold {
        None => ExecutionResult::logic_fail("Missing gold label"),
        Some(gold) if gold.trim().eq_ignore_ascii_case(predicted) => ExecutionResult::pass(),
        Some(gold) => ExecutionResult::logic_fail(format!(
            "Predicted {}, expected {}",
            predicted,
            gold.trim()
        )),
    }
}
