//! End-to-end test: Stage 1 repairs a population whose programs and tests
//! disagree on predicate names, then Stage 2 runs on the repaired population.

use coevo_alignment::{AlignmentStatus, RepairKey, VocabAligner};
use coevo_engine::CoEvoEngine;
use coevo_evaluator::{FitnessEvaluator, InMemoryMetricsSink};
use coevo_oracle::{render_query, WorldExecutionOracle};
use coevo_tests::{quick_config, reference_programs, world_model, world_tests};
use coevo_types::{CandidateProgram, CandidateTest, IndividualKind, Population};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const MISSPELLED: &str = "covered_fire_v2 => yes\ncovered_war_v2 => no";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One correct program followed by three that misspell both predicates.
fn mixed_programs() -> Population<CandidateProgram> {
    let mut programs = reference_programs(1);
    for _ in 0..3 {
        programs.push(CandidateProgram::new(MISSPELLED));
    }
    programs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn misspelled_programs_are_repaired_one_per_pass() {
    let mut programs = mixed_programs();
    let broken: Vec<RepairKey> = programs
        .iter()
        .skip(1)
        .map(|p| RepairKey::Program(p.id()))
        .collect();
    let mut tests = world_tests(&["covered_fire", "covered_war"]);
    let sink = Arc::new(InMemoryMetricsSink::new());
    let evaluator =
        FitnessEvaluator::new(Arc::new(WorldExecutionOracle::new())).with_sink(sink.clone());
    let mut rng = StdRng::seed_from_u64(0);

    let report = VocabAligner::default()
        .run(
            &evaluator,
            &world_model(0, 0.0, 0.0),
            &mut programs,
            &mut tests,
            "vocab_round_00",
            &mut rng,
        )
        .await;

    assert_eq!(report.status, AlignmentStatus::Aligned);
    assert_eq!(report.iterations, 4);
    let repaired: Vec<RepairKey> = report.repairs.iter().map(|r| r.key).collect();
    assert_eq!(repaired, broken);
    assert!(report.repairs.iter().all(|r| r.applied && !r.fallback));
    assert!(programs.iter().all(|p| p.vocab_fitness == 1.0));
    for iteration in 1..=4 {
        let scope = format!("vocab_round_00/iter_{:02}", iteration);
        assert_eq!(sink.in_scope(&scope).len(), 4);
    }
}

#[tokio::test]
async fn misspelled_test_is_rewritten_in_place() {
    let mut programs = reference_programs(3);
    let mut tests = Population::from_members(vec![
        CandidateTest::from_query(render_query("covered_theft", "yes")),
        CandidateTest::from_query(render_query("covered_theft_v2", "yes")),
    ]);
    let broken_id = tests.get(1).unwrap().id();
    let evaluator = FitnessEvaluator::new(Arc::new(WorldExecutionOracle::new()));
    let mut rng = StdRng::seed_from_u64(0);

    let report = VocabAligner::default()
        .run(
            &evaluator,
            &world_model(0, 0.0, 0.0),
            &mut programs,
            &mut tests,
            "r",
            &mut rng,
        )
        .await;

    assert!(report.is_aligned());
    assert_eq!(report.repairs.len(), 1);
    assert_eq!(report.repairs[0].key.kind(), IndividualKind::Test);
    let repaired = tests.find(broken_id).unwrap();
    assert!(!repaired.query().contains("_v2"));
    assert_eq!(repaired.gold_label(), Some("yes"));
}

#[tokio::test]
async fn engine_evolves_after_repairing_supplied_population() {
    let mut engine = CoEvoEngine::new(
        "insurance contract",
        quick_config(2, 4),
        Arc::new(WorldExecutionOracle::new()),
        Arc::new(world_model(4, 0.0, 0.0)),
    )
    .unwrap()
    .with_populations(mixed_programs(), world_tests(&["covered_fire", "covered_war"]));

    let summary = engine.run().await.unwrap();

    assert_eq!(summary.reseeds_used, 0);
    assert_eq!(engine.metrics().repairs_performed, 3);
    assert_eq!(summary.generations.len(), 2);
    assert_eq!(summary.champion().unwrap().logic_fitness, 1.0);
}
