//! Request builder errors.

/// Builder error with location tracking.
///
/// Raised when a request builder is finished without a required field.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", message, line, file)]
pub struct BuilderError {
    /// What the builder reported
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BuilderError {
    /// Create a new builder error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Convert from a derive_builder error message.
impl From<String> for BuilderError {
    #[track_caller]
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
