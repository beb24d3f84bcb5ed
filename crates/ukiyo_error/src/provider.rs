//! Errors raised by a single provider call.

/// How a provider failure affects the candidate chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FailureClass {
    /// Credentials were rejected or missing.
    #[display("credential")]
    Credential,
    /// The requested model does not exist at the provider.
    #[display("not-found")]
    NotFound,
    /// Anything else: network trouble, timeouts, 5xx, empty or malformed bodies.
    #[display("transient")]
    Transient,
}

/// Provider-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// No API key configured for the provider
    #[display("No API key configured for {}", _0)]
    MissingApiKey(String),
    /// The provider rejected the credentials
    #[display("Unauthorized (HTTP {}): {}", status, message)]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Error body returned by the provider
        message: String,
    },
    /// The provider does not know the requested model
    #[display("Model '{}' not found", _0)]
    ModelNotFound(String),
    /// Non-success status that is neither an auth nor a not-found failure
    #[display("HTTP {} error: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by the provider
        message: String,
    },
    /// Connection or protocol failure before a response arrived
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// The request exceeded its deadline
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// A success response carried no usable content
    #[display("Provider returned an empty response")]
    EmptyResponse,
    /// A success response could not be decoded
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
}

impl ProviderErrorKind {
    /// Classify this failure for fallback decisions.
    ///
    /// ```
    /// use ukiyo_error::{FailureClass, ProviderErrorKind};
    ///
    /// let kind = ProviderErrorKind::Api { status: 503, message: "busy".into() };
    /// assert_eq!(kind.class(), FailureClass::Transient);
    /// ```
    pub fn class(&self) -> FailureClass {
        match self {
            ProviderErrorKind::MissingApiKey(_) | ProviderErrorKind::Unauthorized { .. } => {
                FailureClass::Credential
            }
            ProviderErrorKind::ModelNotFound(_) => FailureClass::NotFound,
            _ => FailureClass::Transient,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{FailureClass, ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Unauthorized {
///     status: 401,
///     message: "invalid key".into(),
/// });
/// assert_eq!(err.class(), FailureClass::Credential);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for `self.kind.class()`.
    pub fn class(&self) -> FailureClass {
        self.kind.class()
    }
}

/// Result type for a single provider call.
pub type ProviderResult<T> = Result<T, ProviderError>;
