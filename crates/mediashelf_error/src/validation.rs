//! Request validation errors.

/// Reasons a create request is rejected before ingestion starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Title is empty or whitespace only
    #[display("Title must not be blank")]
    BlankTitle,

    /// Title contains no character that survives slugging
    #[display("Title '{}' produces an empty collection id", _0)]
    EmptySlug(String),

    /// No asset files were supplied
    #[display("At least one asset is required")]
    NoAssets,

    /// Every supplied asset was empty
    #[display("All {} uploaded assets are empty", _0)]
    EmptyAssets(usize),

    /// Asset or thumbnail extension is outside the allow-list
    #[display("Unsupported {} extension '{}' for '{}'", kind, extension, filename)]
    UnsupportedExtension {
        /// Media kind whose allow-list was checked
        kind: String,
        /// The offending extension
        extension: String,
        /// Original filename as uploaded
        filename: String,
    },
}

/// Validation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}
