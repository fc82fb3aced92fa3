use crate::error::OracleError;
use async_trait::async_trait;
use coevo_types::ExecutionResult;

/// Runs a program against a query (SMT solver, Prolog interpreter, ...).
///
/// Implementations own their timeout and retry policy. Repeated calls within
/// one evaluation pass must be comparable. An `Err` is never fatal to the
/// caller: the evaluator records it as an `OTHER_FAIL` cell.
#[async_trait]
pub trait ExecutionOracle: Send + Sync {
    async fn execute(&self, program: &str, query: &str) -> Result<ExecutionResult, OracleError>;
}
