//! Configuration error types.

/// What went wrong while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Cannot read configuration: {}", _0)]
    Source(String),
    /// Sources merged but did not match the expected shape
    #[display("Cannot parse configuration: {}", _0)]
    Parse(String),
    /// A setting parsed but has an unusable value
    #[display("Invalid setting '{}': {}", field, reason)]
    Invalid {
        /// Setting name
        field: &'static str,
        /// Why the value is rejected
        reason: String,
    },
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Config Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// Error kind
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with caller location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediashelf_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::Invalid {
    ///     field: "storage_root",
    ///     reason: "must not be empty".to_string(),
    /// });
    /// assert!(err.to_string().contains("storage_root"));
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
