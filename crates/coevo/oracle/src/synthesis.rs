use crate::error::OracleError;
use crate::request::SynthesisRequest;
use async_trait::async_trait;

/// Produces program or test text from a structured request (LLM-backed in production).
#[async_trait]
pub trait SynthesisOracle: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, OracleError>;
}

/// Call the oracle and collapse failures and blank responses into `None`.
///
/// `None` means "no-op": callers keep the current state and move on.
pub async fn synthesize_text(
    oracle: &dyn SynthesisOracle,
    request: &SynthesisRequest,
) -> Option<String> {
    match oracle.synthesize(request).await {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                tracing::warn!(kind = %request.kind(), "synthesis returned empty text");
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(e) => {
            tracing::warn!(kind = %request.kind(), error = %e, "synthesis failed");
            None
        }
    }
}
