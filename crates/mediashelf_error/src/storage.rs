//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file or directory
    #[display("Failed to read: {}", _0)]
    FileRead(String),
    /// Failed to remove a collection tree
    #[display("Failed to remove: {}", _0)]
    Removal(String),
    /// A collection with the same id already exists
    #[display("Collection already exists: {}", _0)]
    Conflict(String),
    /// Background task running blocking I/O failed to complete
    #[display("Blocking task failed: {}", _0)]
    TaskJoin(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use mediashelf_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Conflict("Summer".to_string()));
/// assert!(format!("{}", err).contains("already exists"));
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
    /// Create a new storage error with automatic location tracking.
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
