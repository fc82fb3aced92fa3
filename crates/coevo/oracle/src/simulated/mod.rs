//! Deterministic oracle backends for tests and the demo binary.

mod scripted;
mod world;

pub use scripted::{
    FailingExecutionOracle, FailingSynthesisOracle, FnExecutionOracle, FnSynthesisOracle,
};
pub use world::{
    render_query, KnowledgeWorld, WorldExecutionOracle, WorldSynthesisOracle, MISSPELLING_SUFFIX,
};
