#![deny(unsafe_code)]
//! # coevo-engine
//!
//! The CoCoEvo generational driver.
//!
//! A run seeds both populations through the synthesis oracle, aligns their
//! vocabulary (Stage 1, with a bounded number of emergency reseeds), then
//! evolves them for a fixed number of generations (Stage 2):
//!
//! 1. Spawn program children by crossover and mutation, mixed by a cosine schedule.
//! 2. Re-evaluate and truncate programs by logic fitness.
//! 3. Ask for new tests aimed at the champion's failures.
//! 4. Re-evaluate the cross product and cull tests on the Pareto front.

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod seeding;
pub mod summary;

pub use config::CoEvoConfig;
pub use engine::CoEvoEngine;
pub use error::{ConfigError, EngineError, EngineResult};
pub use metrics::EngineMetrics;
pub use seeding::{seed_populations, seed_programs, seed_tests};
pub use summary::{GenerationReport, ProgramSummary, RunSummary, TestSummary};
