//! Initial population synthesis, also used by emergency reseeds.

use coevo_oracle::{synthesize_text, SynthesisOracle, SynthesisRequest};
use coevo_types::{split_blocks, CandidateProgram, CandidateTest, Population};

/// Request one batch of `count` tests and split it into individual tests.
pub async fn seed_tests(
    synthesis: &dyn SynthesisOracle,
    problem: &str,
    count: usize,
) -> Vec<CandidateTest> {
    if count == 0 {
        return Vec::new();
    }
    let request = SynthesisRequest::GenerateTests {
        problem: problem.to_string(),
        count,
    };
    match synthesize_text(synthesis, &request).await {
        Some(raw) => split_blocks(&raw, count)
            .into_iter()
            .map(CandidateTest::from_query)
            .collect(),
        None => Vec::new(),
    }
}

/// Request `count` programs, each pinned to the vocabulary of `reference_tests`.
/// Empty responses are skipped.
pub async fn seed_programs(
    synthesis: &dyn SynthesisOracle,
    problem: &str,
    count: usize,
    reference_tests: &[String],
) -> Vec<CandidateProgram> {
    let mut programs = Vec::with_capacity(count);
    for _ in 0..count {
        let request = SynthesisRequest::GenerateProgram {
            problem: problem.to_string(),
            reference_tests: reference_tests.to_vec(),
        };
        if let Some(text) = synthesize_text(synthesis, &request).await {
            programs.push(CandidateProgram::new(text));
        }
    }
    programs
}

/// Fresh test and program populations: tests first, then programs that
/// reference them.
pub async fn seed_populations(
    synthesis: &dyn SynthesisOracle,
    problem: &str,
    program_count: usize,
    test_count: usize,
) -> (Population<CandidateProgram>, Population<CandidateTest>) {
    let tests = seed_tests(synthesis, problem, test_count).await;
    let queries: Vec<String> = tests.iter().map(|t| t.query().to_string()).collect();
    let programs = seed_programs(synthesis, problem, program_count, &queries).await;
    tracing::info!(
        programs = programs.len(),
        tests = tests.len(),
        "seeded populations"
    );
    (Population::from_members(programs), Population::from_members(tests))
}
