//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, JsonError, StorageError, ValidationError};

/// Every error a mediashelf operation can raise.
///
/// # Examples
///
/// ```
/// use mediashelf_error::{MediashelfError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::FileRead("images/x".to_string()));
/// let err: MediashelfError = storage_err.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MediashelfErrorKind {
    /// Filesystem storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Request rejected before any filesystem mutation
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Request builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Mediashelf error with kind discrimination.
///
/// # Examples
///
/// ```
/// use mediashelf_error::{ConfigError, ConfigErrorKind, MediashelfResult};
///
/// fn might_fail() -> MediashelfResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Parse("expected a table".to_string())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Mediashelf Error: {}", _0)]
pub struct MediashelfError(Box<MediashelfErrorKind>);

impl MediashelfError {
    /// Create a new error from a kind.
    pub fn new(kind: MediashelfErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MediashelfErrorKind {
        &self.0
    }

    /// Description of what went wrong, without the source location.
    ///
    /// Suitable for responses shown to end users.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediashelf_error::{MediashelfError, ValidationError, ValidationErrorKind};
    ///
    /// let err = MediashelfError::from(ValidationError::new(ValidationErrorKind::NoAssets));
    /// assert_eq!(err.summary(), "At least one asset is required");
    /// assert!(err.to_string().contains(" at line "));
    /// ```
    pub fn summary(&self) -> String {
        match self.kind() {
            MediashelfErrorKind::Storage(e) => e.kind.to_string(),
            MediashelfErrorKind::Validation(e) => e.kind().to_string(),
            MediashelfErrorKind::Config(e) => e.kind.to_string(),
            MediashelfErrorKind::Json(e) => format!("cannot encode {}: {}", e.document, e.message),
            MediashelfErrorKind::Builder(e) => e.message.clone(),
        }
    }

    /// Whether this error was raised by request validation.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), MediashelfErrorKind::Validation(_))
    }

    /// Whether this error reports an id collision.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self.kind(),
            MediashelfErrorKind::Storage(StorageError {
                kind: crate::StorageErrorKind::Conflict(_),
                ..
            })
        )
    }
}

// Generic From implementation for any type that converts to MediashelfErrorKind
impl<T> From<T> for MediashelfError
where
    T: Into<MediashelfErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for mediashelf operations.
pub type MediashelfResult<T> = std::result::Result<T, MediashelfError>;
