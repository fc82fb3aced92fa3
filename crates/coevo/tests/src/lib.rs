//! Shared fixtures for the CoCoEvo integration tests.

use coevo_alignment::AlignmentConfig;
use coevo_engine::CoEvoConfig;
use coevo_oracle::{render_query, KnowledgeWorld, WorldSynthesisOracle};
use coevo_types::{CandidateProgram, CandidateTest, Population};

/// Small, seeded configuration that finishes quickly.
pub fn quick_config(generations: usize, seed: u64) -> CoEvoConfig {
    CoEvoConfig {
        max_generations: generations,
        pop_cap_programs: 5,
        pop_cap_tests: 6,
        max_reseed_attempts: 3,
        rng_seed: Some(seed),
        alignment: AlignmentConfig::demo(),
        ..CoEvoConfig::default()
    }
}

/// Simulated model with the given noise levels over the insurance world.
pub fn world_model(seed: u64, vocab_noise: f64, logic_noise: f64) -> WorldSynthesisOracle {
    WorldSynthesisOracle::new(KnowledgeWorld::insurance(), seed)
        .with_vocab_noise(vocab_noise)
        .with_logic_noise(logic_noise)
}

/// Correctly labelled query for `predicate` in the insurance world.
pub fn world_test(predicate: &str) -> CandidateTest {
    let world = KnowledgeWorld::insurance();
    let gold = world.answer(predicate).unwrap_or("yes");
    CandidateTest::from_query(render_query(predicate, gold))
}

pub fn world_tests(predicates: &[&str]) -> Population<CandidateTest> {
    Population::from_members(predicates.iter().map(|p| world_test(p)).collect())
}

/// `count` copies of the program that answers every predicate correctly.
pub fn reference_programs(count: usize) -> Population<CandidateProgram> {
    let text = KnowledgeWorld::insurance().reference_program();
    Population::from_members((0..count).map(|_| CandidateProgram::new(text.clone())).collect())
}
