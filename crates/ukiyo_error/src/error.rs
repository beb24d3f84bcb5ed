//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, GatewayError, HttpError, PipelineError, ProviderError,
    StorageError,
};

/// Every error condition a ukiyo operation can surface.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{HttpError, UkiyoError};
///
/// let err: UkiyoError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum UkiyoErrorKind {
    /// HTTP client error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Single provider call failed
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Text or image gateway failed
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Persistence error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Illustration output error
    #[from(StorageError)]
    Storage(StorageError),
}

/// ukiyo error with kind discrimination.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{ConfigError, UkiyoResult};
///
/// fn might_fail() -> UkiyoResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("ukiyo Error: {}", _0)]
pub struct UkiyoError(Box<UkiyoErrorKind>);

impl UkiyoError {
    /// Create a new error from a kind.
    pub fn new(kind: UkiyoErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &UkiyoErrorKind {
        &self.0
    }

    /// Whether the failure traces back to rejected or missing credentials.
    ///
    /// ```
    /// use ukiyo_error::{ProviderError, ProviderErrorKind, UkiyoError};
    ///
    /// let err: UkiyoError =
    ///     ProviderError::new(ProviderErrorKind::MissingApiKey("Gemini".into())).into();
    /// assert!(err.is_credential());
    /// ```
    pub fn is_credential(&self) -> bool {
        match self.kind() {
            UkiyoErrorKind::Gateway(e) => e.is_credential(),
            UkiyoErrorKind::Provider(e) => {
                e.class() == crate::FailureClass::Credential
            }
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to UkiyoErrorKind
impl<T> From<T> for UkiyoError
where
    T: Into<UkiyoErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for ukiyo operations.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{PipelineError, PipelineErrorKind, UkiyoResult};
///
/// fn validate(prompt: &str) -> UkiyoResult<()> {
///     if prompt.trim().is_empty() {
///         return Err(PipelineError::new(PipelineErrorKind::EmptyPrompt).into());
///     }
///     Ok(())
/// }
///
/// assert!(validate("  ").is_err());
/// ```
pub type UkiyoResult<T> = Result<T, UkiyoError>;
