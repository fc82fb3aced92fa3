//! Property tests: Stage-1 target selection never exceeds the per-individual
//! repair cap and never repairs the same individual in consecutive passes.

use coevo_alignment::{
    select_refactor_target, CatastropheTarget, RepairKey, RepairState, TargetChoice,
};
use coevo_types::{PassRates, ProgramId, TestId};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rates for `p` programs and `t` tests over `iters` passes.
fn arb_run() -> impl Strategy<Value = (usize, usize, Vec<Vec<f64>>)> {
    (1usize..5, 1usize..5, 1usize..25).prop_flat_map(|(p, t, iters)| {
        (
            Just(p),
            Just(t),
            prop::collection::vec(prop::collection::vec(0.0f64..=1.0, p + t), iters),
        )
    })
}

/// Drive selection over the rate sequence and return the repairs made.
fn simulate(
    p: usize,
    t: usize,
    passes: &[Vec<f64>],
    max_tries: u32,
    cooldown: usize,
    seed: u64,
) -> Vec<(usize, RepairKey)> {
    let program_ids: Vec<ProgramId> = (0..p).map(|_| ProgramId::new()).collect();
    let test_ids: Vec<TestId> = (0..t).map(|_| TestId::new()).collect();
    let mut state = RepairState::new(max_tries, cooldown);
    let mut catastrophe = CatastropheTarget::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut repairs = Vec::new();

    for (n, rates) in passes.iter().enumerate() {
        let iteration = n + 1;
        let rates = PassRates {
            programs: rates[..p].to_vec(),
            tests: rates[p..].to_vec(),
        };
        let choice = select_refactor_target(
            &rates,
            &program_ids,
            &test_ids,
            &state,
            iteration,
            &mut catastrophe,
            &mut rng,
        );
        match choice {
            TargetChoice::Worst(target) | TargetChoice::Fallback(target) => {
                state.record(target.key, iteration);
                repairs.push((iteration, target.key));
            }
            TargetChoice::Idle => {}
            TargetChoice::Exhausted => break,
        }
    }
    repairs
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// No individual is repaired more than `max_tries` times.
    #[test]
    fn attempts_never_exceed_cap(
        (p, t, passes) in arb_run(),
        max_tries in 1u32..4,
        cooldown in 0usize..3,
        seed in any::<u64>(),
    ) {
        let repairs = simulate(p, t, &passes, max_tries, cooldown, seed);
        let mut counts: HashMap<RepairKey, u32> = HashMap::new();
        for (_, key) in &repairs {
            *counts.entry(*key).or_default() += 1;
        }
        prop_assert!(counts.values().all(|c| *c <= max_tries));
        prop_assert!(repairs.len() <= (p + t) * max_tries as usize);
    }

    /// With any cooldown, the same individual is never repaired in two
    /// consecutive passes.
    #[test]
    fn no_back_to_back_repairs(
        (p, t, passes) in arb_run(),
        cooldown in 1usize..3,
        seed in any::<u64>(),
    ) {
        let repairs = simulate(p, t, &passes, 2, cooldown, seed);
        for pair in repairs.windows(2) {
            let (i1, k1) = pair[0];
            let (i2, k2) = pair[1];
            if i2 == i1 + 1 {
                prop_assert_ne!(k1, k2);
            }
        }
    }

    /// At most one repair happens per pass.
    #[test]
    fn one_repair_per_pass((p, t, passes) in arb_run(), seed in any::<u64>()) {
        let repairs = simulate(p, t, &passes, 2, 1, seed);
        let iterations: Vec<usize> = repairs.iter().map(|(i, _)| *i).collect();
        prop_assert!(iterations.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(repairs.len() <= passes.len());
    }
}
