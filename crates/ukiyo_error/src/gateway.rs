//! Errors raised by the text and image gateways.

use crate::ProviderError;

/// Gateway failure conditions.
#[derive(Debug, Clone, derive_more::Display)]
pub enum GatewayErrorKind {
    /// A candidate rejected the credentials; remaining candidates were not tried
    #[display("{} rejected the credentials (model '{}'): {}", provider, model, cause.kind)]
    Credential {
        /// Provider display name
        provider: String,
        /// Model that was being called
        model: String,
        /// The underlying provider failure
        cause: ProviderError,
    },
    /// Every candidate model failed
    #[display("{} failed after {} model(s); last error: {}", provider, attempted, last.kind)]
    Exhausted {
        /// Provider display name
        provider: String,
        /// Number of models attempted
        attempted: usize,
        /// Failure of the last model attempted
        last: Box<ProviderError>,
    },
    /// The tier was configured with no models
    #[display("{} has no candidate models configured", _0)]
    NoCandidates(String),
    /// Both the primary and fallback tiers failed
    #[display(
        "Primary provider failed: {}\n\nFallback provider failed: {}",
        primary.kind,
        fallback.kind
    )]
    AllTiersFailed {
        /// Failure of the primary tier
        primary: Box<GatewayError>,
        /// Failure of the fallback tier
        fallback: Box<GatewayError>,
    },
}

/// Gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::NoCandidates("Novita AI".into()));
/// assert!(format!("{}", err).contains("no candidate models"));
/// assert!(!err.is_credential());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether a credential failure caused this error, directly or through
    /// either tier of a combined failure.
    pub fn is_credential(&self) -> bool {
        match &self.kind {
            GatewayErrorKind::Credential { .. } => true,
            GatewayErrorKind::AllTiersFailed { primary, fallback } => {
                primary.is_credential() || fallback.is_credential()
            }
            _ => false,
        }
    }
}
