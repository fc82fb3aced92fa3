//! Property tests: Stage 1 always terminates within `max_iters` evaluation
//! passes and respects the repair cap, whatever the oracles answer.

use coevo_alignment::{AlignmentConfig, AlignmentStatus, RepairKey, VocabAligner};
use coevo_evaluator::FitnessEvaluator;
use coevo_oracle::{
    FailingSynthesisOracle, FnExecutionOracle, FnSynthesisOracle, SynthesisOracle,
};
use coevo_types::{CandidateProgram, CandidateTest, ExecutionResult, Population};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deterministic verdict from the texts: vocab failure when their lengths
/// share the given parity.
fn verdict(program: &str, query: &str, parity: usize) -> ExecutionResult {
    if (program.len() + query.len()) % 2 == parity {
        ExecutionResult::vocab_fail("Unknown procedure p/0")
    } else {
        ExecutionResult::pass()
    }
}

fn arb_texts(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 1..max)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The loop ends within budget and no individual exceeds the repair cap.
    #[test]
    fn stage_one_terminates_within_budget(
        programs in arb_texts(5),
        queries in arb_texts(5),
        max_iters in 1usize..10,
        max_tries in 1u32..4,
        parity in 0usize..2,
        repairs_succeed in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let evaluator = FitnessEvaluator::new(Arc::new(FnExecutionOracle::new(
                move |p: &str, q: &str| Ok(verdict(p, q, parity)),
            )));
            let rewriting = FnSynthesisOracle::new(|_| Ok("rewritten".to_string()));
            let config = AlignmentConfig::default()
                .with_max_iters(max_iters)
                .with_max_repair_tries(max_tries);
            let mut programs = Population::from_members(
                programs.into_iter().map(CandidateProgram::new).collect(),
            );
            let mut tests = Population::from_members(
                queries.into_iter().map(CandidateTest::from_query).collect(),
            );
            let mut rng = StdRng::seed_from_u64(seed);

            let synthesis: &dyn SynthesisOracle = if repairs_succeed {
                &rewriting
            } else {
                &FailingSynthesisOracle
            };

            let report = VocabAligner::new(config)
                .run(&evaluator, synthesis, &mut programs, &mut tests, "p", &mut rng)
                .await;

            prop_assert!(report.iterations >= 1);
            prop_assert!(report.iterations <= max_iters);
            prop_assert!(report.repairs.len() <= report.iterations);
            prop_assert_ne!(report.status, AlignmentStatus::NothingEvaluated);

            let mut counts: HashMap<RepairKey, u32> = HashMap::new();
            for r in &report.repairs {
                *counts.entry(r.key).or_default() += 1;
                prop_assert!(r.iteration <= report.iterations);
                if !repairs_succeed {
                    prop_assert!(!r.applied);
                }
            }
            prop_assert!(counts.values().all(|c| *c <= max_tries));
            if report.is_aligned() {
                prop_assert!(programs.iter().all(|p| p.vocab_fitness >= 0.8));
                prop_assert!(tests.iter().all(|t| t.vocab_fitness >= 0.8));
            }
            Ok(())
        })?;
    }
}
