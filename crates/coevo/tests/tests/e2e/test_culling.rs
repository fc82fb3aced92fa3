//! End-to-end test: evaluated tests are culled on the confidence/discrimination
//! Pareto front, and the driver keeps the test population at its cap.

use coevo_engine::{CoEvoConfig, CoEvoEngine};
use coevo_evaluator::FitnessEvaluator;
use coevo_oracle::{KnowledgeWorld, WorldExecutionOracle};
use coevo_selection::{non_dominated_fronts, ParetoMode, ParetoSelector};
use coevo_tests::{quick_config, reference_programs, world_model, world_tests};
use coevo_types::{CandidateProgram, Population, TestId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The reference program with the given predicates answered wrongly.
fn flipped(predicates: &[&str]) -> CandidateProgram {
    let world = KnowledgeWorld::insurance();
    let text = world
        .reference_program()
        .lines()
        .map(|line| match line.split_once(" => ") {
            Some((p, answer)) if predicates.contains(&p) => {
                let wrong = if answer == "yes" { "no" } else { "yes" };
                format!("{} => {}", p, wrong)
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    CandidateProgram::new(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_front_survives_the_cull() {
    let mut programs = Population::from_members(vec![
        flipped(&[]),
        flipped(&["covered_war"]),
        flipped(&["covered_fire", "covered_theft"]),
    ]);
    let mut tests = world_tests(&[
        "covered_fire",
        "covered_war",
        "covered_theft",
        "covered_flood",
    ]);
    let evaluator = FitnessEvaluator::new(Arc::new(WorldExecutionOracle::new()));
    evaluator.evaluate(&mut programs, &mut tests, "cull").await;

    let points: Vec<Vec<f64>> = tests
        .iter()
        .map(|t| vec![t.confidence, t.discrimination])
        .collect();
    let fronts = non_dominated_fronts(&points);
    let front0: HashSet<TestId> = fronts[0]
        .iter()
        .map(|i| tests.get(*i).unwrap().id())
        .collect();
    assert_eq!(front0.len(), 3);
    let war = tests.get(1).unwrap().id();
    assert!(!front0.contains(&war));

    let mut rng = StdRng::seed_from_u64(0);
    let selected: HashSet<TestId> = ParetoSelector::new()
        .with_mode(ParetoMode::Strict)
        .select(tests.as_slice(), 3, &mut rng)
        .into_iter()
        .collect();

    assert_eq!(selected, front0);
}

#[tokio::test]
async fn universally_passed_tests_carry_no_discrimination() {
    let mut programs = reference_programs(3);
    let mut tests = world_tests(&["covered_flood", "refund_within_30_days"]);
    let evaluator = FitnessEvaluator::new(Arc::new(WorldExecutionOracle::new()));
    evaluator.evaluate(&mut programs, &mut tests, "cull").await;

    for t in tests.iter() {
        assert_eq!(t.discrimination, 0.0);
        assert_eq!(t.logic_fitness, 1.0);
        assert!(t.confidence > 0.0);
    }
}

#[tokio::test]
async fn driver_keeps_tests_at_cap() {
    let config = CoEvoConfig {
        pop_cap_tests: 4,
        new_tests_per_generation: Some(10),
        ..quick_config(2, 8)
    };
    let mut engine = CoEvoEngine::new(
        "insurance contract",
        config,
        Arc::new(WorldExecutionOracle::new()),
        Arc::new(world_model(8, 0.0, 0.5)),
    )
    .unwrap();

    let summary = engine.run().await.unwrap();

    for g in &summary.generations {
        assert_eq!(g.tests_added, 10);
        assert_eq!(g.tests_after_cull, 4);
    }
    assert_eq!(engine.tests().len(), 4);
}
