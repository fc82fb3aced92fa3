use crate::summary::GenerationReport;
use serde::{Deserialize, Serialize};

/// Driver counters for one run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub generations_completed: u64,
    /// Children inserted into the program population.
    pub children_spawned: u64,
    /// Children dropped because the oracle returned nothing.
    pub children_discarded: u64,
    pub tests_spawned: u64,
    pub tests_discarded: u64,
    pub reseeds_used: u32,
    /// Stage-1 repairs across all alignment rounds.
    pub repairs_performed: u64,
    /// Champion logic fitness per generation (last N values).
    pub champion_history: Vec<f64>,
    max_history: usize,
}

impl EngineMetrics {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            ..Default::default()
        }
    }

    pub fn record_generation(&mut self, report: &GenerationReport) {
        self.generations_completed += 1;
        self.children_spawned += report.children_added as u64;
        self.children_discarded += report.children_discarded as u64;
        self.tests_spawned += report.tests_added as u64;
        self.tests_discarded += report.tests_discarded as u64;
        self.champion_history.push(report.champion_fitness);
        if self.champion_history.len() > self.max_history {
            self.champion_history.remove(0);
        }
    }

    pub fn record_reseed(&mut self) {
        self.reseeds_used += 1;
    }

    pub fn record_repairs(&mut self, count: usize) {
        self.repairs_performed += count as u64;
    }

    /// Share of spawn requests that produced a child.
    pub fn spawn_success_rate(&self) -> f64 {
        let total = self.children_spawned + self.children_discarded;
        if total == 0 {
            return 1.0;
        }
        self.children_spawned as f64 / total as f64
    }

    pub fn best_champion_fitness(&self) -> Option<f64> {
        self.champion_history.iter().copied().reduce(f64::max)
    }
}
