use serde::{Deserialize, Serialize};

/// Stage-1 tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Pass rate every program and test must reach on the vocab layer.
    pub good_threshold: f64,
    /// Maximum evaluation passes per run.
    pub max_iters: usize,
    /// Repairs allowed per individual per run.
    pub max_repair_tries: u32,
    /// Iterations an individual sits out after being repaired.
    pub cooldown_iters: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            good_threshold: 0.8,
            max_iters: 5,
            max_repair_tries: 2,
            cooldown_iters: 1,
        }
    }
}

impl AlignmentConfig {
    /// Short runs for demos and tests.
    pub fn demo() -> Self {
        Self {
            max_iters: 8,
            ..Self::default()
        }
    }

    /// More patience for hard problems.
    pub fn thorough() -> Self {
        Self {
            good_threshold: 0.9,
            max_iters: 20,
            max_repair_tries: 3,
            cooldown_iters: 2,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.good_threshold = threshold;
        self
    }

    pub fn with_max_iters(mut self, iters: usize) -> Self {
        self.max_iters = iters;
        self
    }

    pub fn with_max_repair_tries(mut self, tries: u32) -> Self {
        self.max_repair_tries = tries;
        self
    }

    pub fn with_cooldown(mut self, iters: usize) -> Self {
        self.cooldown_iters = iters;
        self
    }
}
