use coevo_types::{CandidateProgram, CandidateTest, Population, ProgramId, TestId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Outcome of one Stage-2 generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub crossover_ratio: f64,
    pub crossover_requested: usize,
    pub mutation_requested: usize,
    pub children_added: usize,
    pub children_discarded: usize,
    pub tests_added: usize,
    pub tests_discarded: usize,
    pub champion_id: Option<ProgramId>,
    pub champion_fitness: f64,
    pub programs_after_cull: usize,
    pub tests_after_cull: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: ProgramId,
    pub logic_fitness: f64,
    pub vocab_fitness: f64,
    pub text: String,
}

impl From<&CandidateProgram> for ProgramSummary {
    fn from(p: &CandidateProgram) -> Self {
        Self {
            id: p.id(),
            logic_fitness: p.logic_fitness,
            vocab_fitness: p.vocab_fitness,
            text: p.text().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub id: TestId,
    pub logic_fitness: f64,
    pub vocab_fitness: f64,
    pub confidence: f64,
    pub discrimination: f64,
    pub gold_label: Option<String>,
    pub query: String,
}

impl From<&CandidateTest> for TestSummary {
    fn from(t: &CandidateTest) -> Self {
        Self {
            id: t.id(),
            logic_fitness: t.logic_fitness,
            vocab_fitness: t.vocab_fitness,
            confidence: t.confidence,
            discrimination: t.discrimination,
            gold_label: t.gold_label().map(str::to_string),
            query: t.query().to_string(),
        }
    }
}

/// Final state of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub problem: String,
    pub reseeds_used: u32,
    pub generations: Vec<GenerationReport>,
    /// Ranked by descending logic fitness.
    pub programs: Vec<ProgramSummary>,
    pub tests: Vec<TestSummary>,
}

impl RunSummary {
    pub fn new(
        problem: impl Into<String>,
        programs: &Population<CandidateProgram>,
        tests: &Population<CandidateTest>,
        generations: Vec<GenerationReport>,
        reseeds_used: u32,
    ) -> Self {
        let mut ranked: Vec<ProgramSummary> = programs.iter().map(ProgramSummary::from).collect();
        ranked.sort_by(|a, b| {
            b.logic_fitness
                .partial_cmp(&a.logic_fitness)
                .unwrap_or(Ordering::Equal)
        });
        Self {
            problem: problem.into(),
            reseeds_used,
            generations,
            programs: ranked,
            tests: tests.iter().map(TestSummary::from).collect(),
        }
    }

    pub fn champion(&self) -> Option<&ProgramSummary> {
        self.programs.first()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "— Solutions —")?;
        for p in &self.programs {
            writeln!(
                f,
                "{}\tlogic={:.3}\tvocab={:.3}",
                p.id, p.logic_fitness, p.vocab_fitness
            )?;
            writeln!(f, "{}", p.text)?;
            writeln!(f)?;
        }
        writeln!(f, "— Test Cases —")?;
        for t in &self.tests {
            writeln!(
                f,
                "{}\tlogic={:.3}\tvocab={:.3}\tconf={:.3}\tdisc={:.3}",
                t.id, t.logic_fitness, t.vocab_fitness, t.confidence, t.discrimination
            )?;
            writeln!(f, "{}", t.query)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
