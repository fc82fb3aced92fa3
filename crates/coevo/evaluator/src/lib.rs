#![deny(unsafe_code)]
//! # coevo-evaluator
//!
//! Runs every candidate program against every candidate test through an
//! [`ExecutionOracle`](coevo_oracle::ExecutionOracle), builds the logic and
//! vocab matrices, and writes fitness back onto both populations.
//!
//! Test scoring follows two statistics:
//!
//! - **confidence**: the test's pass rate weighted by the logic fitness of the
//!   programs that pass it, so endorsement by strong programs counts more.
//! - **discrimination**: binary entropy of the pass rate, zero for tests that
//!   everyone passes or everyone fails.
//!
//! One metrics record per program is emitted to a [`MetricsSink`] after each pass.

pub mod evaluator;
pub mod scoring;
pub mod sink;

pub use evaluator::{apply_matrix, FitnessEvaluator};
pub use scoring::{binary_entropy, confidence, cosine_anneal, discrimination, pass_fraction};
pub use sink::{
    InMemoryMetricsSink, MetricsRecord, MetricsSink, NullMetricsSink, TracingMetricsSink,
};
