#![deny(unsafe_code)]
//! # coevo-types
//!
//! Shared data model for the CoCoEvo co-evolution workspace: candidate programs
//! (logic encodings), candidate tests (machine-checkable queries), the
//! stable-identity population arena that owns them, and the fitness matrix
//! produced by every evaluation pass.

pub mod block;
pub mod ids;
pub mod matrix;
pub mod outcome;
pub mod population;
pub mod program;
pub mod test_case;

pub use block::{parse_gold_label, split_blocks, BLOCK_SEPARATOR};
pub use ids::{ProgramId, TestId};
pub use matrix::{compute_pass_rates, FitnessMatrix, MatrixLayer, PassRates};
pub use outcome::{ExecutionResult, IndividualKind, Outcome};
pub use population::{Individual, Population};
pub use program::CandidateProgram;
pub use test_case::CandidateTest;
