//! Shared HTTP plumbing for provider clients.

use std::time::Duration;
use tracing::debug;
use ukiyo_error::{HttpError, ProviderError, ProviderErrorKind, UkiyoResult};

/// Build the reqwest client every provider shares.
///
/// `timeout` bounds each request end to end. A request that exceeds it fails
/// with [`ProviderErrorKind::Timeout`], which the gateways treat as transient.
pub fn build_http_client(timeout: Duration) -> UkiyoResult<reqwest::Client> {
    debug!(timeout_secs = timeout.as_secs(), "Building HTTP client");
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {e}")).into())
}

/// Map a reqwest send/receive failure onto a provider error.
#[track_caller]
pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::new(ProviderErrorKind::Timeout(err.to_string()))
    } else {
        ProviderError::new(ProviderErrorKind::Transport(err.to_string()))
    }
}

/// Fail fast when a backend was constructed without a key.
#[track_caller]
pub(crate) fn require_key(api_key: &str, provider: &str) -> Result<(), ProviderError> {
    if api_key.trim().is_empty() {
        return Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
            provider.to_string(),
        )));
    }
    Ok(())
}
