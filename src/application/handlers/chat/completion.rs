//! Time-bounded provider calls.

use std::time::Duration;

use tokio::time::timeout;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse};

/// Calls the provider, turning an elapsed budget into `AIError::Timeout`.
pub(crate) async fn complete_within(
    provider: &dyn AIProvider,
    request: CompletionRequest,
    budget: Duration,
) -> Result<CompletionResponse, AIError> {
    match timeout(budget, provider.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(AIError::Timeout {
            timeout_secs: budget.as_secs().try_into().unwrap_or(u32::MAX),
        }),
    }
}
