use chrono::{DateTime, Utc};
use coevo_types::ProgramId;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// One program's fitness after an evaluation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Caller-chosen label for the pass, e.g. `vocab_round_00/iter_02` or `gen_0003/post`.
    pub scope: String,
    pub program_id: ProgramId,
    pub logic_fitness: f64,
    pub vocab_fitness: f64,
    pub recorded_at: DateTime<Utc>,
}

impl MetricsRecord {
    pub fn new(scope: impl Into<String>, program_id: ProgramId, logic: f64, vocab: f64) -> Self {
        Self {
            scope: scope.into(),
            program_id,
            logic_fitness: logic,
            vocab_fitness: vocab,
            recorded_at: Utc::now(),
        }
    }
}

/// Destination for per-program metrics records.
pub trait MetricsSink: Send + Sync {
    fn record(&self, record: MetricsRecord);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMetricsSink;

impl MetricsSink for NullMetricsSink {
    fn record(&self, _record: MetricsRecord) {}
}

/// Emits each record as an `info` event on the `coevo::metrics` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn record(&self, record: MetricsRecord) {
        tracing::info!(
            target: "coevo::metrics",
            scope = %record.scope,
            program_id = %record.program_id,
            logic = record.logic_fitness,
            vocab = record.vocab_fitness,
            "fitness"
        );
    }
}

/// Keeps records in memory, in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryMetricsSink {
    records: Mutex<Vec<MetricsRecord>>,
}

impl InMemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetricsRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records whose scope equals `scope`.
    pub fn in_scope(&self, scope: &str) -> Vec<MetricsRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.scope == scope)
            .collect()
    }
}

impl MetricsSink for InMemoryMetricsSink {
    fn record(&self, record: MetricsRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}
