#![deny(unsafe_code)]
//! # coevo-oracle
//!
//! The two black boxes the co-evolution core talks to:
//!
//! - [`ExecutionOracle`] runs one program against one query and classifies the result.
//! - [`SynthesisOracle`] produces new or repaired program/test text from a structured request.
//!
//! Concrete solver and language-model backends live outside this workspace. The
//! [`simulated`] module provides deterministic fakes and a small knowledge world
//! so the whole pipeline can run without external services.

pub mod classify;
pub mod error;
pub mod execution;
pub mod request;
pub mod simulated;
pub mod synthesis;

pub use classify::{judge_prediction, OutcomeClassifier, DEFAULT_VOCAB_PATTERNS};
pub use error::OracleError;
pub use execution::ExecutionOracle;
pub use request::{RequestKind, SynthesisRequest};
pub use simulated::{
    render_query, FailingExecutionOracle, FailingSynthesisOracle, FnExecutionOracle,
    FnSynthesisOracle, KnowledgeWorld, WorldExecutionOracle, WorldSynthesisOracle,
    MISSPELLING_SUFFIX,
};
pub use synthesis::{synthesize_text, SynthesisOracle};
