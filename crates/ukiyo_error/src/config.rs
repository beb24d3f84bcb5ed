//! Configuration error types.

/// Configuration error with source location.
///
/// Raised while loading `ukiyo.toml` layers, resolving credentials, or
/// validating values that the providers and the database adapter require.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use ukiyo_error::ConfigError;
    ///
    /// let err = ConfigError::new("request timeout must be positive");
    /// assert!(err.message.contains("timeout"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A required setting was absent from every configuration layer.
    ///
    /// `fallback_env` names the environment variable that would also satisfy it.
    ///
    /// ```
    /// use ukiyo_error::ConfigError;
    ///
    /// let err = ConfigError::missing("database.url", "DATABASE_URL");
    /// assert!(err.message.contains("DATABASE_URL"));
    /// ```
    #[track_caller]
    pub fn missing(key: &str, fallback_env: &str) -> Self {
        Self::new(format!(
            "'{key}' is not configured (set it in ukiyo.toml or export {fallback_env})"
        ))
    }
}
