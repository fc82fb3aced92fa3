use crate::error::ConfigError;
use coevo_alignment::AlignmentConfig;
use coevo_selection::{ParetoFilter, ParetoMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a co-evolution run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoEvoConfig {
    /// Stage-2 generations.
    pub max_generations: usize,
    /// Program population size after each cull; also children per generation.
    pub pop_cap_programs: usize,
    /// Test population size after each cull.
    pub pop_cap_tests: usize,
    /// Emergency reseeds allowed when Stage 1 fails.
    pub max_reseed_attempts: u32,
    /// Crossover share reached at the last generation.
    pub crossover_max: f64,
    /// Crossover share at the first generation.
    pub crossover_min: f64,
    pub tournament_size: usize,
    /// Targeted tests requested per generation; `None` means `max(1, pop_cap_tests / 10)`.
    pub new_tests_per_generation: Option<usize>,
    /// Failing and passing examples shown per targeted-test request.
    pub feedback_examples: usize,
    /// Programs synthesized at seeding; `None` means `pop_cap_programs`.
    pub seed_programs: Option<usize>,
    /// Tests synthesized at seeding; `None` means `pop_cap_tests`.
    pub seed_tests: Option<usize>,
    pub pareto_mode: ParetoMode,
    pub pareto_filter: Option<ParetoFilter>,
    /// Fixed seed for reproducible runs; `None` draws from entropy.
    pub rng_seed: Option<u64>,
    pub alignment: AlignmentConfig,
}

impl Default for CoEvoConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
            pop_cap_programs: 30,
            pop_cap_tests: 30,
            max_reseed_attempts: 5,
            crossover_max: 0.9,
            crossover_min: 0.1,
            tournament_size: 2,
            new_tests_per_generation: None,
            feedback_examples: 5,
            seed_programs: None,
            seed_tests: None,
            pareto_mode: ParetoMode::Sampled,
            pareto_filter: None,
            rng_seed: None,
            alignment: AlignmentConfig::default(),
        }
    }
}

impl CoEvoConfig {
    /// Small populations and few generations.
    pub fn demo() -> Self {
        Self {
            max_generations: 5,
            pop_cap_programs: 6,
            pop_cap_tests: 8,
            max_reseed_attempts: 3,
            rng_seed: Some(7),
            alignment: AlignmentConfig::demo(),
            ..Self::default()
        }
    }

    /// Larger populations, strict Pareto fill and a more patient Stage 1.
    pub fn thorough() -> Self {
        Self {
            max_generations: 100,
            pop_cap_programs: 50,
            pop_cap_tests: 50,
            max_reseed_attempts: 8,
            pareto_mode: ParetoMode::Strict,
            alignment: AlignmentConfig::thorough(),
            ..Self::default()
        }
    }

    /// Read a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn new_tests_count(&self) -> usize {
        self.new_tests_per_generation
            .unwrap_or_else(|| (self.pop_cap_tests / 10).max(1))
    }

    pub fn seed_program_count(&self) -> usize {
        self.seed_programs.unwrap_or(self.pop_cap_programs)
    }

    pub fn seed_test_count(&self) -> usize {
        self.seed_tests.unwrap_or(self.pop_cap_tests)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pop_cap_programs == 0 {
            return Err(invalid("pop_cap_programs must be > 0"));
        }
        if self.pop_cap_tests == 0 {
            return Err(invalid("pop_cap_tests must be > 0"));
        }
        if self.tournament_size == 0 {
            return Err(invalid("tournament_size must be > 0"));
        }
        for (name, value) in [
            ("crossover_min", self.crossover_min),
            ("crossover_max", self.crossover_max),
            ("alignment.good_threshold", self.alignment.good_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if self.crossover_min > self.crossover_max {
            return Err(invalid(format!(
                "crossover_min ({}) exceeds crossover_max ({})",
                self.crossover_min, self.crossover_max
            )));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
