/// Errors raised by an execution or synthesis backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("timeout: oracle call exceeded {0}ms")]
    Timeout(u64),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("provider error: {0}")]
    Provider(String),
}
