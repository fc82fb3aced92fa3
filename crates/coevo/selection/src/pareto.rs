use coevo_types::{CandidateTest, TestId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How to fill the remaining capacity from a front that does not fit whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParetoMode {
    /// Highest combined fitness first.
    Strict,
    /// Uniform random sample; keeps more diversity.
    #[default]
    Sampled,
}

/// Optional post-filter on the selected subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParetoFilter {
    /// Drop members whose combined fitness is below the population average.
    AboveAverage,
}

/// An objective a test can be ranked on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMetric {
    Confidence,
    Discrimination,
    LogicFitness,
    VocabFitness,
    Combined,
}

impl TestMetric {
    pub fn value(self, test: &CandidateTest) -> f64 {
        match self {
            TestMetric::Confidence => test.confidence,
            TestMetric::Discrimination => test.discrimination,
            TestMetric::LogicFitness => test.logic_fitness,
            TestMetric::VocabFitness => test.vocab_fitness,
            TestMetric::Combined => test.combined_fitness(),
        }
    }
}

/// `a` is at least as good as `b` on every metric and strictly better on one.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly = false;
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return false;
        }
        if x > y {
            strictly = true;
        }
    }
    strictly
}

/// Layered non-dominated sorting. Each front lists indices into `points` in
/// ascending order; every index appears in exactly one front.
pub fn non_dominated_fronts(points: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut fronts = Vec::new();

    while !remaining.is_empty() {
        let (front, rest): (Vec<usize>, Vec<usize>) = remaining.iter().partition(|&&p| {
            !remaining
                .iter()
                .any(|&q| q != p && dominates(&points[q], &points[p]))
        });
        if front.is_empty() {
            // Only reachable with NaN scores; keep the rest as one front.
            fronts.push(rest);
            break;
        }
        fronts.push(front);
        remaining = rest;
    }
    fronts
}

/// Multi-objective test culling.
#[derive(Clone, Debug)]
pub struct ParetoSelector {
    mode: ParetoMode,
    filter: Option<ParetoFilter>,
    metrics: Vec<TestMetric>,
}

impl ParetoSelector {
    /// Sampled mode, no filter, ranked on confidence and discrimination.
    pub fn new() -> Self {
        Self {
            mode: ParetoMode::default(),
            filter: None,
            metrics: vec![TestMetric::Confidence, TestMetric::Discrimination],
        }
    }

    pub fn with_mode(mut self, mode: ParetoMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_filter(mut self, filter: Option<ParetoFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<TestMetric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn mode(&self) -> ParetoMode {
        self.mode
    }

    /// Pick at most `cap` indices.
    ///
    /// `points[i]` holds the objective values of member `i` and `scalar[i]` its
    /// combined fitness. Whole fronts are taken while they fit; the first front
    /// that does not fit (front 0 included) is cut down according to the mode.
    pub fn select_indices<R: Rng + ?Sized>(
        &self,
        points: &[Vec<f64>],
        scalar: &[f64],
        cap: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let mut selected: Vec<usize> = Vec::with_capacity(cap.min(points.len()));

        for front in non_dominated_fronts(points) {
            let room = cap - selected.len();
            if room == 0 {
                break;
            }
            if front.len() <= room {
                selected.extend(front);
                continue;
            }
            match self.mode {
                ParetoMode::Strict => {
                    let mut ranked = front;
                    ranked.sort_by(|a, b| {
                        score(scalar, *b)
                            .partial_cmp(&score(scalar, *a))
                            .unwrap_or(Ordering::Equal)
                    });
                    selected.extend(ranked.into_iter().take(room));
                }
                ParetoMode::Sampled => {
                    selected.extend(front.choose_multiple(rng, room).copied());
                }
            }
            break;
        }

        if let Some(ParetoFilter::AboveAverage) = self.filter {
            let avg = scalar.iter().sum::<f64>() / scalar.len().max(1) as f64;
            selected.retain(|i| score(scalar, *i) >= avg);
        }
        selected
    }

    /// Ids of the tests that survive a cull down to `cap`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        tests: &[CandidateTest],
        cap: usize,
        rng: &mut R,
    ) -> Vec<TestId> {
        let points: Vec<Vec<f64>> = tests
            .iter()
            .map(|t| self.metrics.iter().map(|m| m.value(t)).collect())
            .collect();
        let scalar: Vec<f64> = tests.iter().map(CandidateTest::combined_fitness).collect();

        let chosen = self.select_indices(&points, &scalar, cap, rng);
        tracing::debug!(
            population = tests.len(),
            cap,
            selected = chosen.len(),
            mode = ?self.mode,
            "pareto selection"
        );
        chosen.into_iter().map(|i| tests[i].id()).collect()
    }
}

impl Default for ParetoSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn score(scalar: &[f64], idx: usize) -> f64 {
    scalar.get(idx).copied().unwrap_or(0.0)
}
