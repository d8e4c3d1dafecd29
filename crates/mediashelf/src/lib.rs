//! mediashelf - filesystem media collections.
//!
//! Treats every subdirectory of `{storage_root}/{images|videos}` as a
//! collection of ordered media files with an optional `metadata.json`
//! sidecar, and exposes list/show/create/delete over them.
//!
//! # Architecture
//!
//! - `mediashelf_error` - Error types
//! - `mediashelf_storage` - Slugs, sidecars, scanning, thumbnails, repository, ingestion
//!
//! This crate re-exports both and adds the `mediashelf` command-line front end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;

pub use mediashelf_error::*;
pub use mediashelf_storage::*;
