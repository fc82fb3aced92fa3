use crate::error::OracleError;
use crate::execution::ExecutionOracle;
use crate::request::{RequestKind, SynthesisRequest};
use crate::synthesis::SynthesisOracle;
use async_trait::async_trait;
use coevo_types::ExecutionResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Execution oracle backed by a plain function of `(program, query)`.
pub struct FnExecutionOracle<F> {
    f: F,
    calls: AtomicUsize,
}

impl<F> FnExecutionOracle<F>
where
    F: Fn(&str, &str) -> Result<ExecutionResult, OracleError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `execute` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> ExecutionOracle for FnExecutionOracle<F>
where
    F: Fn(&str, &str) -> Result<ExecutionResult, OracleError> + Send + Sync,
{
    async fn execute(&self, program: &str, query: &str) -> Result<ExecutionResult, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.f)(program, query)
    }
}

/// Execution oracle whose every call fails.
pub struct FailingExecutionOracle;

#[async_trait]
impl ExecutionOracle for FailingExecutionOracle {
    async fn execute(&self, _program: &str, _query: &str) -> Result<ExecutionResult, OracleError> {
        Err(OracleError::Unavailable("simulated solver failure".into()))
    }
}

/// Synthesis oracle backed by a plain function; records every request it sees.
pub struct FnSynthesisOracle<F> {
    f: F,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl<F> FnSynthesisOracle<F>
where
    F: Fn(&SynthesisRequest) -> Result<String, OracleError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the requests received, in arrival order.
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn count_of(&self, kind: RequestKind) -> usize {
        self.requests
            .lock()
            .map(|r| r.iter().filter(|req| req.kind() == kind).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl<F> SynthesisOracle for FnSynthesisOracle<F>
where
    F: Fn(&SynthesisRequest) -> Result<String, OracleError> + Send + Sync,
{
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, OracleError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        (self.f)(request)
    }
}

/// Synthesis oracle whose every call fails.
pub struct FailingSynthesisOracle;

#[async_trait]
impl SynthesisOracle for FailingSynthesisOracle {
    async fn synthesize(&self, _request: &SynthesisRequest) -> Result<String, OracleError> {
        Err(OracleError::Provider("simulated LLM failure".into()))
    }
}
