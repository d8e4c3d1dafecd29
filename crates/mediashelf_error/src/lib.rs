//! Error types for mediashelf.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use mediashelf_error::{MediashelfResult, ValidationError, ValidationErrorKind};
//!
//! fn check_title(title: &str) -> MediashelfResult<()> {
//!     if title.trim().is_empty() {
//!         Err(ValidationError::new(ValidationErrorKind::BlankTitle))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_title("   ").is_err());
//! assert!(check_title("Summer").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod json;
mod storage;
mod validation;

pub use builder::BuilderError;
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{MediashelfError, MediashelfErrorKind, MediashelfResult};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
