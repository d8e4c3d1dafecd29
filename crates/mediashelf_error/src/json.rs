//! JSON encoding errors.

/// A document could not be encoded as JSON.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: cannot encode {}: {} at line {} in {}", document, message, line, file)]
pub struct JsonError {
    /// What was being encoded, e.g. a sidecar file name
    pub document: String,
    /// Message from the serializer
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Record a serializer failure for `document`.
    #[track_caller]
    pub fn new(document: impl Into<String>, source: &serde_json::Error) -> Self {
        let location = std::panic::Location::caller();
        Self {
            document: document.into(),
            message: source.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}
