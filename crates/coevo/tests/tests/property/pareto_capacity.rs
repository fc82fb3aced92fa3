//! Property tests: Pareto selection never exceeds its cap, never repeats an
//! individual, and keeps the whole first front whenever it fits.

use coevo_selection::{dominates, non_dominated_fronts, ParetoMode, ParetoSelector};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Scores on a coarse grid so ties and dominance both show up often.
fn arb_points() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(
        prop::collection::vec((0u8..=4).prop_map(|x| x as f64 / 4.0), 2),
        0..25,
    )
}

fn arb_mode() -> impl Strategy<Value = ParetoMode> {
    prop_oneof![Just(ParetoMode::Strict), Just(ParetoMode::Sampled)]
}

fn scalar(points: &[Vec<f64>]) -> Vec<f64> {
    points.iter().map(|p| p.iter().sum::<f64>() / 2.0).collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Fronts partition the population and no member of a front is dominated
    /// by another member of the same front.
    #[test]
    fn fronts_partition_without_internal_dominance(points in arb_points()) {
        let fronts = non_dominated_fronts(&points);
        let mut seen = HashSet::new();
        for front in &fronts {
            for &a in front {
                prop_assert!(seen.insert(a));
                for &b in front {
                    prop_assert!(!dominates(&points[b], &points[a]));
                }
            }
        }
        prop_assert_eq!(seen.len(), points.len());
    }

    /// The selection size is exactly `min(cap, population)` and has no duplicates.
    #[test]
    fn selection_fills_cap_without_duplicates(
        points in arb_points(),
        cap in 0usize..30,
        mode in arb_mode(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = ParetoSelector::new()
            .with_mode(mode)
            .select_indices(&points, &scalar(&points), cap, &mut rng);

        prop_assert_eq!(selected.len(), cap.min(points.len()));
        let unique: HashSet<usize> = selected.iter().copied().collect();
        prop_assert_eq!(unique.len(), selected.len());
    }

    /// When the first front fits under the cap, all of it is kept.
    #[test]
    fn first_front_is_kept_when_it_fits(
        points in arb_points(),
        cap in 1usize..30,
        mode in arb_mode(),
        seed in any::<u64>(),
    ) {
        let fronts = non_dominated_fronts(&points);
        prop_assume!(!fronts.is_empty() && fronts[0].len() <= cap);

        let mut rng = StdRng::seed_from_u64(seed);
        let selected: HashSet<usize> = ParetoSelector::new()
            .with_mode(mode)
            .select_indices(&points, &scalar(&points), cap, &mut rng)
            .into_iter()
            .collect();
        for i in &fronts[0] {
            prop_assert!(selected.contains(i));
        }
    }

    /// Fronts are taken whole, in order, until one no longer fits.
    #[test]
    fn whole_fronts_are_taken_before_any_cut(
        points in arb_points(),
        cap in 1usize..30,
        seed in any::<u64>(),
    ) {
        let fronts = non_dominated_fronts(&points);
        let mut rng = StdRng::seed_from_u64(seed);
        let selected: HashSet<usize> = ParetoSelector::new()
            .select_indices(&points, &scalar(&points), cap, &mut rng)
            .into_iter()
            .collect();

        let mut taken = 0;
        for front in &fronts {
            if taken + front.len() > cap {
                break;
            }
            for i in front {
                prop_assert!(selected.contains(i));
            }
            taken += front.len();
        }
    }
}
