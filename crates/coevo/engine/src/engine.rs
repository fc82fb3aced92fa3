use crate::config::CoEvoConfig;
use crate::error::{EngineError, EngineResult};
use crate::metrics::EngineMetrics;
use crate::seeding::seed_populations;
use crate::summary::{GenerationReport, RunSummary};
use coevo_alignment::{AlignmentReport, VocabAligner};
use coevo_evaluator::{cosine_anneal, FitnessEvaluator, MetricsSink};
use coevo_oracle::{synthesize_text, ExecutionOracle, SynthesisOracle, SynthesisRequest};
use coevo_selection::{
    champion_index, random_index, tournament_select, truncation_order, ParetoSelector,
};
use coevo_types::{
    split_blocks, CandidateProgram, CandidateTest, FitnessMatrix, MatrixLayer, Population,
    ProgramId, TestId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

/// Matrix of the latest evaluation pass together with the ids its rows and
/// columns referred to. Culls reorder the populations, so lookups go by id.
struct EvaluationSnapshot {
    matrix: FitnessMatrix,
    program_ids: Vec<ProgramId>,
    test_ids: Vec<TestId>,
}

/// The CoCoEvo driver: seeding, Stage-1 alignment with emergency reseeds,
/// and the Stage-2 generational loop.
pub struct CoEvoEngine {
    problem: String,
    config: CoEvoConfig,
    synthesis: Arc<dyn SynthesisOracle>,
    evaluator: FitnessEvaluator,
    aligner: VocabAligner,
    selector: ParetoSelector,
    programs: Population<CandidateProgram>,
    tests: Population<CandidateTest>,
    rng: StdRng,
    metrics: EngineMetrics,
    snapshot: Option<EvaluationSnapshot>,
    generations: Vec<GenerationReport>,
}

impl CoEvoEngine {
    pub fn new(
        problem: impl Into<String>,
        config: CoEvoConfig,
        execution: Arc<dyn ExecutionOracle>,
        synthesis: Arc<dyn SynthesisOracle>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            problem: problem.into(),
            aligner: VocabAligner::new(config.alignment.clone()),
            selector: ParetoSelector::new()
                .with_mode(config.pareto_mode)
                .with_filter(config.pareto_filter),
            evaluator: FitnessEvaluator::new(execution),
            synthesis,
            programs: Population::new(),
            tests: Population::new(),
            rng,
            metrics: EngineMetrics::new(config.max_generations.max(1)),
            snapshot: None,
            generations: Vec::new(),
            config,
        })
    }

    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.evaluator = self.evaluator.with_sink(sink);
        self
    }

    /// Start from the given populations instead of synthesizing them.
    pub fn with_populations(
        mut self,
        programs: Population<CandidateProgram>,
        tests: Population<CandidateTest>,
    ) -> Self {
        self.programs = programs;
        self.tests = tests;
        self.snapshot = None;
        self
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn config(&self) -> &CoEvoConfig {
        &self.config
    }

    pub fn programs(&self) -> &Population<CandidateProgram> {
        &self.programs
    }

    pub fn tests(&self) -> &Population<CandidateTest> {
        &self.tests
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    pub fn generations(&self) -> &[GenerationReport] {
        &self.generations
    }

    /// Matrix of the most recent evaluation pass.
    pub fn last_matrix(&self) -> Option<&FitnessMatrix> {
        self.snapshot.as_ref().map(|s| &s.matrix)
    }

    /// Highest logic fitness program; the first one on ties.
    pub fn champion(&self) -> Option<&CandidateProgram> {
        champion_index(&self.program_fitness()).and_then(|i| self.programs.get(i))
    }

    /// Replace both populations with freshly synthesized ones.
    pub async fn seed(&mut self) {
        let (programs, tests) = seed_populations(
            self.synthesis.as_ref(),
            &self.problem,
            self.config.seed_program_count(),
            self.config.seed_test_count(),
        )
        .await;
        self.programs = programs;
        self.tests = tests;
        self.snapshot = None;
    }

    /// Emergency reseed: discard everything and synthesize from scratch.
    pub async fn reseed(&mut self) {
        self.programs.clear();
        self.tests.clear();
        self.seed().await;
        self.metrics.record_reseed();
    }

    /// Run Stage 1, reseeding up to `max_reseed_attempts` times until it aligns.
    pub async fn ensure_alignment(&mut self) -> EngineResult<AlignmentReport> {
        let mut report = self.align("vocab_round_00").await;
        if report.is_aligned() {
            return Ok(report);
        }

        let attempts = self.config.max_reseed_attempts;
        for attempt in 1..=attempts {
            tracing::warn!(
                attempt,
                max_attempts = attempts,
                status = ?report.status,
                "vocabulary alignment failed, reseeding"
            );
            self.reseed().await;
            report = self.align(&format!("vocab_round_{:02}", attempt)).await;
            if report.is_aligned() {
                tracing::info!(attempt, "alignment reached after reseed");
                return Ok(report);
            }
        }

        tracing::warn!(attempts, "reseed budget exhausted");
        Err(EngineError::AlignmentExhausted { attempts })
    }

    async fn align(&mut self, round_tag: &str) -> AlignmentReport {
        let report = self
            .aligner
            .run(
                &self.evaluator,
                self.synthesis.as_ref(),
                &mut self.programs,
                &mut self.tests,
                round_tag,
                &mut self.rng,
            )
            .await;
        self.metrics.record_repairs(report.repairs.len());
        self.snapshot = None;
        report
    }

    /// Evaluate the full cross product and keep the matrix for champion feedback.
    pub async fn evaluate(&mut self, scope: &str) {
        let matrix = self
            .evaluator
            .evaluate(&mut self.programs, &mut self.tests, scope)
            .await;
        self.snapshot = Some(EvaluationSnapshot {
            matrix,
            program_ids: self.programs.ids(),
            test_ids: self.tests.ids(),
        });
    }

    /// Seed if needed, align, then evolve for `max_generations`.
    pub async fn run(&mut self) -> EngineResult<RunSummary> {
        if self.programs.is_empty() && self.tests.is_empty() {
            self.seed().await;
        }
        self.ensure_alignment().await?;

        self.evaluate("initial").await;
        if self.programs.is_empty() {
            return Err(EngineError::NoPrograms);
        }

        for generation in 1..=self.config.max_generations {
            self.step_generation(generation).await?;
        }
        tracing::info!(
            generations = self.metrics.generations_completed,
            reseeds = self.metrics.reseeds_used,
            best = self.metrics.best_champion_fitness().unwrap_or(0.0),
            "co-evolution finished"
        );
        Ok(self.summary())
    }

    /// One Stage-2 generation (1-indexed).
    pub async fn step_generation(&mut self, generation: usize) -> EngineResult<GenerationReport> {
        if self.programs.is_empty() {
            return Err(EngineError::NoPrograms);
        }
        let scope = format!("gen_{:04}", generation);
        tracing::info!(generation, "generation start");

        let crossover_ratio = cosine_anneal(
            self.config.crossover_min,
            self.config.crossover_max,
            generation.saturating_sub(1),
            self.config.max_generations,
        );
        let (crossover_requested, mutation_requested) = split_children(
            self.config.pop_cap_programs,
            crossover_ratio,
            self.programs.len(),
        );

        let (children, children_discarded) = self
            .spawn_children(crossover_requested, mutation_requested)
            .await;
        let children_added = children.len();
        self.programs.extend(children);
        if children_added > 0 {
            self.evaluate(&format!("{}/spawned_programs", scope)).await;
        }
        self.cull_programs();
        if self.programs.is_empty() {
            return Err(EngineError::NoPrograms);
        }

        let new_tests = self.spawn_targeted_tests().await;
        let tests_added = new_tests.len();
        let tests_discarded = self.config.new_tests_count() - tests_added;
        self.tests.extend(new_tests);

        self.evaluate(&format!("{}/post", scope)).await;
        if self.programs.is_empty() {
            return Err(EngineError::NoPrograms);
        }
        self.cull_tests();

        let champion = self.champion();
        let report = GenerationReport {
            generation,
            crossover_ratio,
            crossover_requested,
            mutation_requested,
            children_added,
            children_discarded,
            tests_added,
            tests_discarded,
            champion_id: champion.map(|p| p.id()),
            champion_fitness: champion.map(|p| p.logic_fitness).unwrap_or(0.0),
            programs_after_cull: self.programs.len(),
            tests_after_cull: self.tests.len(),
        };
        tracing::info!(
            generation,
            ratio = crossover_ratio,
            children = children_added,
            new_tests = tests_added,
            champion_fitness = report.champion_fitness,
            programs = report.programs_after_cull,
            tests = report.tests_after_cull,
            "generation complete"
        );
        self.metrics.record_generation(&report);
        self.generations.push(report.clone());
        Ok(report)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::new(
            self.problem.clone(),
            &self.programs,
            &self.tests,
            self.generations.clone(),
            self.metrics.reseeds_used,
        )
    }

    fn program_fitness(&self) -> Vec<f64> {
        self.programs.iter().map(|p| p.logic_fitness).collect()
    }

    fn program_text(&self, idx: usize) -> Option<String> {
        self.programs.get(idx).map(|p| p.text().to_string())
    }

    /// Children land in a side buffer so every parent comes from the
    /// population as it was at the start of the generation.
    async fn spawn_children(
        &mut self,
        crossover: usize,
        mutation: usize,
    ) -> (Vec<CandidateProgram>, usize) {
        let fitness = self.program_fitness();
        let k = self.config.tournament_size;
        let mut children = Vec::with_capacity(crossover + mutation);
        let mut discarded = 0;

        for _ in 0..crossover {
            let a = tournament_select(&fitness, k, &mut self.rng);
            let b = tournament_select(&fitness, k, &mut self.rng);
            let parents = a
                .and_then(|a| self.program_text(a))
                .zip(b.and_then(|b| self.program_text(b)));
            let Some((parent_a, parent_b)) = parents else {
                discarded += 1;
                continue;
            };
            let request = SynthesisRequest::CrossoverPrograms {
                problem: self.problem.clone(),
                parent_a,
                parent_b,
            };
            match self.spawn(&request).await {
                Some(child) => children.push(child),
                None => discarded += 1,
            }
        }

        for _ in 0..mutation {
            let parent = random_index(fitness.len(), &mut self.rng);
            let Some(program) = parent.and_then(|i| self.program_text(i)) else {
                discarded += 1;
                continue;
            };
            let request = SynthesisRequest::MutateProgram {
                problem: self.problem.clone(),
                program,
            };
            match self.spawn(&request).await {
                Some(child) => children.push(child),
                None => discarded += 1,
            }
        }

        tracing::debug!(
            crossover,
            mutation,
            added = children.len(),
            discarded,
            "spawned children"
        );
        (children, discarded)
    }

    async fn spawn(&self, request: &SynthesisRequest) -> Option<CandidateProgram> {
        synthesize_text(self.synthesis.as_ref(), request)
            .await
            .map(CandidateProgram::new)
    }

    /// Keep the `pop_cap_programs` fittest; ties keep insertion order.
    fn cull_programs(&mut self) {
        let keep: HashSet<ProgramId> = truncation_order(&self.program_fitness())
            .into_iter()
            .take(self.config.pop_cap_programs)
            .filter_map(|i| self.programs.get(i).map(|p| p.id()))
            .collect();
        let removed = self.programs.retain_ids(&keep);
        tracing::debug!(removed, kept = self.programs.len(), "culled programs");
    }

    fn cull_tests(&mut self) {
        let survivors: HashSet<TestId> = self
            .selector
            .select(self.tests.as_slice(), self.config.pop_cap_tests, &mut self.rng)
            .into_iter()
            .collect();
        let removed = self.tests.retain_ids(&survivors);
        tracing::debug!(removed, kept = self.tests.len(), "culled tests");
    }

    /// Failing and passing test queries of `champion` in the latest matrix.
    fn champion_feedback(&self, champion: ProgramId) -> (Vec<String>, Vec<String>) {
        let Some(snapshot) = &self.snapshot else {
            return (Vec::new(), Vec::new());
        };
        let Some(row) = snapshot.program_ids.iter().position(|id| *id == champion) else {
            return (Vec::new(), Vec::new());
        };
        let limit = self.config.feedback_examples;
        let queries = |indices: Vec<usize>| -> Vec<String> {
            indices
                .into_iter()
                .filter_map(|j| snapshot.test_ids.get(j))
                .filter_map(|id| self.tests.find(*id))
                .take(limit)
                .map(|t| t.query().to_string())
                .collect()
        };
        (
            queries(snapshot.matrix.failing_tests(MatrixLayer::Logic, row)),
            queries(snapshot.matrix.passing_tests(MatrixLayer::Logic, row)),
        )
    }

    /// New tests aimed at the champion; each response contributes its first block.
    async fn spawn_targeted_tests(&mut self) -> Vec<CandidateTest> {
        let Some((champion_id, champion_text)) =
            self.champion().map(|p| (p.id(), p.text().to_string()))
        else {
            return Vec::new();
        };
        let (failing, passing) = self.champion_feedback(champion_id);
        tracing::debug!(
            program_id = %champion_id,
            failing = failing.len(),
            passing = passing.len(),
            "requesting targeted tests"
        );

        let mut tests = Vec::new();
        for _ in 0..self.config.new_tests_count() {
            let request = SynthesisRequest::TargetedTest {
                problem: self.problem.clone(),
                champion: champion_text.clone(),
                failing: failing.clone(),
                passing: passing.clone(),
            };
            let block = synthesize_text(self.synthesis.as_ref(), &request)
                .await
                .and_then(|raw| split_blocks(&raw, 1).into_iter().next());
            if let Some(query) = block {
                tests.push(CandidateTest::from_query(query));
            }
        }
        tests
    }
}

/// Split `wanted` children into crossover and mutation counts. Crossover needs
/// two parents; the ratio is clamped to [0, 1].
fn split_children(wanted: usize, crossover_ratio: f64, parents: usize) -> (usize, usize) {
    let crossover = if parents >= 2 {
        let ratio = crossover_ratio.clamp(0.0, 1.0);
        ((wanted as f64 * ratio).floor() as usize).min(wanted)
    } else {
        0
    };
    (crossover, wanted.saturating_sub(crossover))
}
