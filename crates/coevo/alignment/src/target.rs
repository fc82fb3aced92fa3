use crate::state::{CatastropheTarget, RepairKey, RepairState};
use coevo_types::{IndividualKind, PassRates, ProgramId, TestId};
use rand::seq::SliceRandom;
use rand::Rng;

/// An individual picked for repair, with its position in the latest matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefactorTarget {
    pub key: RepairKey,
    pub index: usize,
    pub rate: f64,
}

impl RefactorTarget {
    pub fn kind(&self) -> IndividualKind {
        self.key.kind()
    }
}

/// Outcome of target selection for one Stage-1 iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetChoice {
    /// Lowest pass rate among eligible individuals.
    Worst(RefactorTarget),
    /// Nothing eligible; picked at random by the catastrophe alternation.
    Fallback(RefactorTarget),
    /// Everything left is still cooling down; skip this iteration.
    Idle,
    /// Every individual has used its whole repair budget.
    Exhausted,
}

/// Pick the single individual to repair at `iteration`.
///
/// Individuals that used `max_repair_tries` or were repaired within the
/// cooldown window are skipped. If none remain, the catastrophe alternation
/// names a kind and a uniformly random non-exhausted individual of that kind
/// (or of the other kind, if it has none) is chosen. The fallback never picks
/// an individual repaired in the previous iteration and never exceeds the
/// attempt cap.
pub fn select_refactor_target<R: Rng + ?Sized>(
    rates: &PassRates,
    program_ids: &[ProgramId],
    test_ids: &[TestId],
    state: &RepairState,
    iteration: usize,
    catastrophe: &mut CatastropheTarget,
    rng: &mut R,
) -> TargetChoice {
    let programs = program_ids
        .iter()
        .zip(&rates.programs)
        .enumerate()
        .map(|(index, (id, rate))| RefactorTarget {
            key: RepairKey::Program(*id),
            index,
            rate: *rate,
        });
    let tests = test_ids
        .iter()
        .zip(&rates.tests)
        .enumerate()
        .map(|(index, (id, rate))| RefactorTarget {
            key: RepairKey::Test(*id),
            index,
            rate: *rate,
        });
    let candidates: Vec<RefactorTarget> = programs.chain(tests).collect();

    let worst = candidates
        .iter()
        .filter(|c| state.is_eligible(&c.key, iteration))
        .min_by(|a, b| {
            a.rate
                .partial_cmp(&b.rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(target) = worst {
        return TargetChoice::Worst(*target);
    }

    if candidates.iter().all(|c| state.is_exhausted(&c.key)) {
        return TargetChoice::Exhausted;
    }

    let kind = catastrophe.advance();
    let pool = |kind: IndividualKind| -> Vec<RefactorTarget> {
        candidates
            .iter()
            .filter(|c| c.kind() == kind)
            .filter(|c| {
                !state.is_exhausted(&c.key) && !state.repaired_just_before(&c.key, iteration)
            })
            .copied()
            .collect()
    };
    let mut choices = pool(kind);
    if choices.is_empty() {
        choices = pool(kind.other());
    }
    match choices.choose(rng) {
        Some(target) => TargetChoice::Fallback(*target),
        None => TargetChoice::Idle,
    }
}
