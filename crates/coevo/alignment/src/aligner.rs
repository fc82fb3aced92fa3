use crate::config::AlignmentConfig;
use crate::repair::{program_repair_request, test_repair_request};
use crate::state::{CatastropheTarget, RepairKey, RepairState};
use crate::target::{select_refactor_target, RefactorTarget, TargetChoice};
use coevo_evaluator::FitnessEvaluator;
use coevo_oracle::{synthesize_text, SynthesisOracle};
use coevo_types::{CandidateProgram, CandidateTest, FitnessMatrix, MatrixLayer, Population};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a Stage-1 run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    /// Every program and test reached the threshold.
    Aligned,
    /// `max_iters` passes ran without reaching the threshold.
    NotConverged,
    /// Every individual used its repair budget before the threshold was reached.
    BudgetSpent,
    /// An evaluation pass produced no rates (no programs or no tests).
    NothingEvaluated,
}

/// One repair performed during a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RepairRecord {
    pub iteration: usize,
    pub key: RepairKey,
    /// Vocab pass rate of the target when it was chosen.
    pub rate: f64,
    /// Chosen by the catastrophe alternation rather than by lowest rate.
    pub fallback: bool,
    /// The oracle returned text and it replaced the old one.
    pub applied: bool,
}

#[derive(Clone, Debug)]
pub struct AlignmentReport {
    pub status: AlignmentStatus,
    /// Evaluation passes performed.
    pub iterations: usize,
    pub repairs: Vec<RepairRecord>,
}

impl AlignmentReport {
    pub fn is_aligned(&self) -> bool {
        self.status == AlignmentStatus::Aligned
    }
}

/// Stage-1 vocabulary-alignment loop.
#[derive(Clone, Debug, Default)]
pub struct VocabAligner {
    config: AlignmentConfig,
}

impl VocabAligner {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Evaluate and repair until aligned or out of iterations.
    ///
    /// Repair bookkeeping lives only for the duration of this call.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        evaluator: &FitnessEvaluator,
        synthesis: &dyn SynthesisOracle,
        programs: &mut Population<CandidateProgram>,
        tests: &mut Population<CandidateTest>,
        round_tag: &str,
        rng: &mut R,
    ) -> AlignmentReport {
        let cfg = &self.config;
        let mut state = RepairState::new(cfg.max_repair_tries, cfg.cooldown_iters);
        let mut catastrophe = CatastropheTarget::default();
        let mut repairs = Vec::new();

        for iteration in 1..=cfg.max_iters {
            let scope = format!("{}/iter_{:02}", round_tag, iteration);
            tracing::info!(round = round_tag, iteration, "vocabulary alignment pass");
            let matrix = evaluator.evaluate(programs, tests, &scope).await;

            let rates = matrix.pass_rates(MatrixLayer::Vocab);
            if rates.is_empty() {
                tracing::warn!(
                    round = round_tag,
                    programs = programs.len(),
                    tests = tests.len(),
                    "nothing evaluated"
                );
                return report(AlignmentStatus::NothingEvaluated, iteration, repairs);
            }
            if rates.all_at_least(cfg.good_threshold) {
                tracing::info!(round = round_tag, iteration, "vocabulary aligned");
                return report(AlignmentStatus::Aligned, iteration, repairs);
            }

            let choice = select_refactor_target(
                &rates,
                &programs.ids(),
                &tests.ids(),
                &state,
                iteration,
                &mut catastrophe,
                rng,
            );
            let (target, fallback) = match choice {
                TargetChoice::Worst(target) => (target, false),
                TargetChoice::Fallback(target) => {
                    tracing::warn!(
                        round = round_tag,
                        iteration,
                        kind = %target.kind(),
                        "no eligible target, falling back to catastrophe alternation"
                    );
                    (target, true)
                }
                TargetChoice::Idle => {
                    tracing::debug!(round = round_tag, iteration, "all targets cooling down");
                    continue;
                }
                TargetChoice::Exhausted => {
                    tracing::warn!(round = round_tag, iteration, "repair budget spent");
                    return report(AlignmentStatus::BudgetSpent, iteration, repairs);
                }
            };

            tracing::debug!(
                round = round_tag,
                iteration,
                kind = %target.kind(),
                index = target.index,
                id = %target.key,
                rate = target.rate,
                "repairing"
            );
            let applied = repair(synthesis, &matrix, programs, tests, &target).await;
            state.record(target.key, iteration);
            repairs.push(RepairRecord {
                iteration,
                key: target.key,
                rate: target.rate,
                fallback,
                applied,
            });
        }

        tracing::info!(
            round = round_tag,
            repairs = state.total_repairs(),
            "failed to align within max_iters"
        );
        report(AlignmentStatus::NotConverged, cfg.max_iters, repairs)
    }
}

fn report(
    status: AlignmentStatus,
    iterations: usize,
    repairs: Vec<RepairRecord>,
) -> AlignmentReport {
    AlignmentReport {
        status,
        iterations,
        repairs,
    }
}

async fn repair(
    synthesis: &dyn SynthesisOracle,
    matrix: &FitnessMatrix,
    programs: &mut Population<CandidateProgram>,
    tests: &mut Population<CandidateTest>,
    target: &RefactorTarget,
) -> bool {
    let request = match target.key {
        RepairKey::Program(_) => {
            let Some(program) = programs.get(target.index) else {
                return false;
            };
            let failing: Vec<&CandidateTest> = matrix
                .failing_tests(MatrixLayer::Vocab, target.index)
                .into_iter()
                .filter_map(|j| tests.get(j))
                .collect();
            program_repair_request(program, &failing)
        }
        RepairKey::Test(_) => {
            let Some(test) = tests.get(target.index) else {
                return false;
            };
            let failing: Vec<&CandidateProgram> = matrix
                .failing_programs(MatrixLayer::Vocab, target.index)
                .into_iter()
                .filter_map(|i| programs.get(i))
                .collect();
            test_repair_request(test, &failing)
        }
    };

    let Some(text) = synthesize_text(synthesis, &request).await else {
        return false;
    };
    match target.key {
        RepairKey::Program(_) => programs.replace_text(target.index, text),
        RepairKey::Test(_) => tests.replace_text(target.index, text),
    }
}
