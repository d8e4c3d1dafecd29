//! The `metadata.json` sidecar.

use crate::atomic::write_atomic;
use mediashelf_error::{JsonError, MediashelfResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the sidecar inside a collection directory.
pub const METADATA_FILE: &str = "metadata.json";

/// User-authored description of a collection.
///
/// Only `title` is required when decoding; the other fields fall back to
/// empty values so hand-written sidecars stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Human title, stored verbatim (the id is derived from it)
    pub title: String,
    /// Artist or author credit
    #[serde(default)]
    pub artist: String,
    /// Ordered tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

impl CollectionMetadata {
    /// Metadata carrying only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: String::new(),
            tags: Vec::new(),
            description: String::new(),
        }
    }
}

/// Reads and replaces collection sidecars.
///
/// Reads are lenient: a missing or undecodable sidecar is reported as
/// absent. Writes replace the whole file through a temp file and rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataStore;

impl MetadataStore {
    /// Load the sidecar of the collection at `dir`, if there is a usable one.
    #[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
    pub async fn get(dir: &Path) -> Option<CollectionMetadata> {
        let path = dir.join(METADATA_FILE);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!("No metadata sidecar");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable metadata sidecar");
                return None;
            }
        };

        match serde_json::from_slice::<CollectionMetadata>(&bytes) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed metadata sidecar");
                None
            }
        }
    }

    /// Replace the sidecar of the collection at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be encoded or the file cannot
    /// be written. A failed write leaves the previous sidecar in place.
    #[tracing::instrument(skip(dir, metadata), fields(dir = %dir.display(), title = %metadata.title))]
    pub async fn put(dir: &Path, metadata: &CollectionMetadata) -> MediashelfResult<()> {
        let json = serde_json::to_vec_pretty(metadata)
            .map_err(|e| JsonError::new(METADATA_FILE, &e))?;

        write_atomic(&dir.join(METADATA_FILE), &json).await?;

        tracing::debug!("Wrote metadata sidecar");
        Ok(())
    }
}
