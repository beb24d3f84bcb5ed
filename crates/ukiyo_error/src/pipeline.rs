//! Generation pipeline error types.

/// Pipeline failure conditions not owned by a provider or the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// The user prompt was blank
    #[display("Prompt must not be empty")]
    EmptyPrompt,
    /// The page/block layout cannot drive a plot
    #[display("Invalid story layout: {}", _0)]
    InvalidLayout(String),
    /// The run was aborted before it finished
    #[display("Generation was cancelled")]
    Cancelled,
    /// The task driving the run panicked
    #[display("Generation task failed: {}", _0)]
    TaskFailed(String),
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use ukiyo_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::EmptyPrompt);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
