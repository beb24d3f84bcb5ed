//! Illustration output error types.

/// Kinds of failures while reading or writing illustration files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the output directory
    #[display("Failed to create output directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an image file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read an existing image file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// The image payload was not a base64 data URI
    #[display("Invalid image payload: {}", _0)]
    InvalidImage(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::InvalidImage("missing prefix".into()));
/// assert!(format!("{}", err).contains("Invalid image"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new StorageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
