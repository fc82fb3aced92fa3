use coevo_oracle::SynthesisRequest;
use coevo_types::{CandidateProgram, CandidateTest};

/// Entries of the counterparts' logs that also appear in `own`, first
/// occurrence order, without duplicates.
pub fn shared_errors<'a, I>(own: &[String], counterparts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut shared: Vec<String> = Vec::new();
    for log in counterparts {
        for entry in log {
            if own.contains(entry) && !shared.contains(entry) {
                shared.push(entry.clone());
            }
        }
    }
    shared
}

/// Repair request for a program, carrying the errors it shares with the
/// tests that failed against it.
pub fn program_repair_request(
    program: &CandidateProgram,
    failing_tests: &[&CandidateTest],
) -> SynthesisRequest {
    let errors = shared_errors(
        &program.error_log,
        failing_tests.iter().map(|t| t.error_log.as_slice()),
    );
    SynthesisRequest::RepairProgram {
        program: program.text().to_string(),
        errors,
    }
}

/// Repair request for a test, carrying the errors it shares with the
/// programs that failed against it. Without shared errors the first failing
/// program is attached as context.
pub fn test_repair_request(
    test: &CandidateTest,
    failing_programs: &[&CandidateProgram],
) -> SynthesisRequest {
    let errors = shared_errors(
        &test.error_log,
        failing_programs.iter().map(|p| p.error_log.as_slice()),
    );
    let fallback_program = if errors.is_empty() {
        failing_programs.first().map(|p| p.text().to_string())
    } else {
        None
    };
    SynthesisRequest::RepairTest {
        query: test.query().to_string(),
        errors,
        fallback_program,
    }
}
