#![deny(unsafe_code)]
//! # coevo-selection
//!
//! Survivor and parent selection for the generational loop.
//!
//! Tests are culled by [`ParetoSelector`] over several objectives (confidence
//! and discrimination by default). Programs only have one objective, so they
//! are culled by [`truncation_order`] and picked as parents by
//! [`tournament_select`].

pub mod pareto;
pub mod tournament;

pub use pareto::{
    dominates, non_dominated_fronts, ParetoFilter, ParetoMode, ParetoSelector, TestMetric,
};
pub use tournament::{champion_index, random_index, tournament_select, truncation_order};
