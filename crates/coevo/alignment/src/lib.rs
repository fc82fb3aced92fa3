#![deny(unsafe_code)]
//! # coevo-alignment
//!
//! Stage 1 of a co-evolution run: make programs and tests speak the same
//! vocabulary before any logic is judged.
//!
//! Each iteration evaluates the full population, reads the vocab layer of the
//! fitness matrix, and stops once every program and every test executes against
//! at least `good_threshold` of its counterparts. Otherwise exactly one
//! individual is repaired through the synthesis oracle. A per-individual
//! attempt cap and cooldown keep a single stubborn individual from soaking up
//! the whole repair budget, and the loop always ends within `max_iters`
//! evaluation passes.

pub mod aligner;
pub mod config;
pub mod repair;
pub mod state;
pub mod target;

pub use aligner::{AlignmentReport, AlignmentStatus, RepairRecord, VocabAligner};
pub use config::AlignmentConfig;
pub use repair::{program_repair_request, shared_errors, test_repair_request};
pub use state::{CatastropheTarget, RepairKey, RepairState};
pub use target::{select_refactor_target, RefactorTarget, TargetChoice};
