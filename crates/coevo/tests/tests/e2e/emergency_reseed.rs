//! End-to-end test: emergency reseeds when Stage 1 cannot align the population,
//! and the fatal error once the reseed budget is spent.

use coevo_engine::{CoEvoEngine, EngineError};
use coevo_evaluator::InMemoryMetricsSink;
use coevo_oracle::{
    render_query, FnSynthesisOracle, OracleError, RequestKind, SynthesisRequest,
    WorldExecutionOracle,
};
use coevo_tests::quick_config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A model that writes programs in its own vocabulary and cannot repair them.
fn stubborn_model(req: &SynthesisRequest) -> Result<String, OracleError> {
    match req {
        SynthesisRequest::GenerateTests { .. } => Ok(format!(
            "{}\n#####\n{}",
            render_query("covered_fire", "yes"),
            render_query("covered_war", "no")
        )),
        SynthesisRequest::GenerateProgram { .. } => Ok("insured_fire => yes".into()),
        SynthesisRequest::RepairProgram { program, .. } => Ok(program.clone()),
        SynthesisRequest::RepairTest { query, .. } => Ok(query.clone()),
        _ => Err(OracleError::Provider("not supported".into())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exhausted_reseeds_surface_as_fatal_error() {
    let model = Arc::new(FnSynthesisOracle::new(stubborn_model));
    let sink = Arc::new(InMemoryMetricsSink::new());
    let mut engine = CoEvoEngine::new(
        "insurance contract",
        quick_config(3, 1),
        Arc::new(WorldExecutionOracle::new()),
        model.clone(),
    )
    .unwrap()
    .with_metrics_sink(sink.clone());

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EngineError::AlignmentExhausted { attempts: 3 }));
    assert_eq!(err.to_string(), "vocabulary alignment failed after 3 reseed attempts");
    assert_eq!(engine.metrics().reseeds_used, 3);
    assert_eq!(model.count_of(RequestKind::GenerateTests), 4);
    assert_eq!(model.count_of(RequestKind::CrossoverPrograms), 0);
    for round in 0..=3 {
        let scope = format!("vocab_round_{:02}/iter_01", round);
        assert!(!sink.in_scope(&scope).is_empty(), "{}", scope);
    }
    assert!(sink.in_scope("initial").is_empty());
}

#[tokio::test]
async fn second_seeding_recovers() {
    let seedings = Arc::new(AtomicUsize::new(0));
    let counter = seedings.clone();
    let model = FnSynthesisOracle::new(move |req: &SynthesisRequest| match req {
        SynthesisRequest::GenerateTests { .. } => {
            counter.fetch_add(1, Ordering::SeqCst);
            stubborn_model(req)
        }
        SynthesisRequest::GenerateProgram { .. } if counter.load(Ordering::SeqCst) >= 2 => {
            Ok("covered_fire => yes\ncovered_war => no".into())
        }
        SynthesisRequest::MutateProgram { program, .. } => Ok(program.clone()),
        SynthesisRequest::TargetedTest { .. } => Ok(render_query("covered_fire", "yes")),
        _ => stubborn_model(req),
    });
    let mut engine = CoEvoEngine::new(
        "insurance contract",
        quick_config(1, 2),
        Arc::new(WorldExecutionOracle::new()),
        Arc::new(model),
    )
    .unwrap();

    let summary = engine.run().await.unwrap();

    assert_eq!(seedings.load(Ordering::SeqCst), 2);
    assert_eq!(summary.reseeds_used, 1);
    assert_eq!(summary.generations.len(), 1);
    assert_eq!(summary.champion().unwrap().logic_fitness, 1.0);
}
