//! Collection repository over the storage root.

use crate::{
    AssetScanner, CollectionDetails, CollectionLocks, CollectionMetadata, CollectionSummary,
    CreateCollection, IngestOutcome, IngestionPipeline, MediaKind, MetadataStore, ScannedAsset,
    ShelfConfig, ThumbnailResolver, is_safe_segment,
};
use mediashelf_error::{MediashelfResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::IntoEnumIterator;

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The collection directory was removed
    Deleted,
    /// No collection with that id exists; nothing was touched
    NotFound,
    /// Removal started but failed; part of the tree may remain
    Failed(String),
}

impl DeleteOutcome {
    /// Whether the collection was found and removed.
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Operations the (out-of-process) transport layer calls.
///
/// Reads never fail loudly: an unknown id is `None` and an unreadable
/// collection is left out of listings. Writes report failure in their
/// return value.
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    /// Summaries of every visible collection of `kind`, sorted by id.
    async fn list(&self, kind: MediaKind) -> Vec<CollectionSummary>;

    /// Full view of collection `id`, or `None` if it does not resolve.
    async fn get(&self, kind: MediaKind, id: &str) -> Option<CollectionDetails>;

    /// Create a collection from uploaded files.
    async fn create(&self, request: CreateCollection) -> IngestOutcome;

    /// Recursively remove collection `id`.
    async fn delete(&self, kind: MediaKind, id: &str) -> DeleteOutcome;

    /// Replace the sidecar of an existing collection.
    ///
    /// Returns `Ok(false)` if the collection does not exist.
    async fn update_metadata(
        &self,
        kind: MediaKind,
        id: &str,
        metadata: &CollectionMetadata,
    ) -> MediashelfResult<bool>;

    /// Whether a directory for collection `id` exists.
    async fn exists(&self, kind: MediaKind, id: &str) -> bool;
}

/// Filesystem-backed [`CollectionStore`].
///
/// Layout: `{storage_root}/{images|videos}/{collection id}/`
///
/// ```text
/// /srv/media/
/// ├── images/
/// │   └── My_Collection/
/// │       ├── 001.jpg
/// │       ├── 002.png
/// │       ├── thumbnail.png
/// │       └── metadata.json
/// └── videos/
///     └── Trip/
///         └── 001.mp4
/// ```
///
/// A directory with no resolvable thumbnail (no dedicated thumbnail and no
/// asset) is hidden: `list` skips it and `get` reports it as absent.
#[derive(Debug, Clone)]
pub struct FileSystemCollections {
    config: Arc<ShelfConfig>,
    locks: CollectionLocks,
    pipeline: IngestionPipeline,
}

/// A collection directory with its assets and thumbnail resolved.
struct ResolvedCollection {
    id: String,
    dir: PathBuf,
    assets: Vec<ScannedAsset>,
    thumbnail: ScannedAsset,
}

impl ResolvedCollection {
    fn resolve(kind: MediaKind, id: String, dir: PathBuf) -> Option<Self> {
        let assets = AssetScanner::scan(&dir, kind);
        let thumbnail = ThumbnailResolver::select(&dir, &assets)?;
        Some(Self {
            id,
            dir,
            assets,
            thumbnail,
        })
    }
}

/// Run blocking directory walks off the async worker threads.
async fn blocking<T, F>(task: F) -> MediashelfResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| StorageError::new(StorageErrorKind::TaskJoin(e.to_string())).into())
}

fn resolve_all(kind: MediaKind, kind_root: &Path) -> Vec<ResolvedCollection> {
    let entries = match std::fs::read_dir(kind_root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %kind_root.display(), error = %e, "Cannot read collection root");
            return Vec::new();
        }
    };

    let mut resolved: Vec<ResolvedCollection> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let id = entry.file_name().to_str()?.to_string();
            if !is_safe_segment(&id) {
                return None;
            }
            let collection = ResolvedCollection::resolve(kind, id, entry.path());
            if collection.is_none() {
                tracing::debug!(dir = %entry.path().display(), "Hiding collection without thumbnail");
            }
            collection
        })
        .collect();

    resolved.sort_by(|a, b| a.id.cmp(&b.id));
    resolved
}

/// Map the result of removing `dir` to what `delete` reports.
fn removal_outcome(dir: &Path, result: std::io::Result<()>) -> DeleteOutcome {
    match result {
        Ok(()) => {
            tracing::info!(dir = %dir.display(), "Deleted collection");
            DeleteOutcome::Deleted
        }
        Err(e) => {
            let error = StorageError::new(StorageErrorKind::Removal(format!(
                "{}: {}",
                dir.display(),
                e
            )));
            tracing::error!(
                error = %error,
                "Collection removal failed; a partial tree may remain"
            );
            DeleteOutcome::Failed(error.kind.to_string())
        }
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

impl FileSystemCollections {
    /// Create a repository rooted at `config.storage_root`.
    ///
    /// Creates the per-kind directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or a directory cannot
    /// be created.
    #[tracing::instrument(skip(config), fields(root = %config.storage_root().display()))]
    pub async fn new(config: ShelfConfig) -> MediashelfResult<Self> {
        config.validate()?;

        for kind in MediaKind::iter() {
            let root = config.kind_root(kind);
            tokio::fs::create_dir_all(&root).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    root.display(),
                    e
                )))
            })?;
        }

        tracing::info!("Opened collection storage");
        let config = Arc::new(config);
        let locks = CollectionLocks::new();
        let pipeline = IngestionPipeline::new(Arc::clone(&config), locks.clone());
        Ok(Self {
            config,
            locks,
            pipeline,
        })
    }

    /// The configuration this repository was opened with.
    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    /// Directory of collection `id`, if `id` is a safe path segment.
    fn dir_for(&self, kind: MediaKind, id: &str) -> Option<PathBuf> {
        if is_safe_segment(id) {
            Some(self.config.collection_dir(kind, id))
        } else {
            tracing::debug!(kind = %kind, id, "Refusing unsafe collection id");
            None
        }
    }
}

#[async_trait::async_trait]
impl CollectionStore for FileSystemCollections {
    #[tracing::instrument(skip(self), fields(kind = %kind))]
    async fn list(&self, kind: MediaKind) -> Vec<CollectionSummary> {
        let kind_root = self.config.kind_root(kind);
        if let Err(e) = tokio::fs::create_dir_all(&kind_root).await {
            tracing::warn!(dir = %kind_root.display(), error = %e, "Cannot create collection root");
            return Vec::new();
        }

        let resolved = match blocking(move || resolve_all(kind, &kind_root)).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!(error = %e, "Collection scan failed");
                return Vec::new();
            }
        };

        let mut summaries = Vec::with_capacity(resolved.len());
        for collection in resolved {
            let metadata = MetadataStore::get(&collection.dir).await;
            summaries.push(CollectionSummary::assemble(
                &self.config,
                kind,
                &collection.id,
                &collection.thumbnail,
                metadata,
            ));
        }

        tracing::debug!(count = summaries.len(), "Listed collections");
        summaries
    }

    #[tracing::instrument(skip(self), fields(kind = %kind))]
    async fn get(&self, kind: MediaKind, id: &str) -> Option<CollectionDetails> {
        let dir = self.dir_for(kind, id)?;
        let _guard = self.locks.acquire(kind, id).await;

        if !is_dir(&dir).await {
            tracing::debug!("Collection not found");
            return None;
        }

        let owned_id = id.to_string();
        let collection = match blocking(move || ResolvedCollection::resolve(kind, owned_id, dir)).await {
            Ok(collection) => collection?,
            Err(e) => {
                tracing::error!(error = %e, "Collection scan failed");
                return None;
            }
        };

        let metadata = MetadataStore::get(&collection.dir).await;
        Some(CollectionDetails::assemble(
            &self.config,
            kind,
            &collection.id,
            &collection.assets,
            &collection.thumbnail,
            metadata,
        ))
    }

    async fn create(&self, request: CreateCollection) -> IngestOutcome {
        self.pipeline.ingest(request).await
    }

    #[tracing::instrument(skip(self), fields(kind = %kind))]
    async fn delete(&self, kind: MediaKind, id: &str) -> DeleteOutcome {
        let Some(dir) = self.dir_for(kind, id) else {
            return DeleteOutcome::NotFound;
        };
        let _guard = self.locks.acquire(kind, id).await;

        if !is_dir(&dir).await {
            tracing::debug!("Nothing to delete");
            return DeleteOutcome::NotFound;
        }

        removal_outcome(&dir, tokio::fs::remove_dir_all(&dir).await)
    }

    #[tracing::instrument(skip(self, metadata), fields(kind = %kind))]
    async fn update_metadata(
        &self,
        kind: MediaKind,
        id: &str,
        metadata: &CollectionMetadata,
    ) -> MediashelfResult<bool> {
        let Some(dir) = self.dir_for(kind, id) else {
            return Ok(false);
        };
        let _guard = self.locks.acquire(kind, id).await;

        if !is_dir(&dir).await {
            return Ok(false);
        }

        MetadataStore::put(&dir, metadata).await?;
        tracing::info!("Replaced collection metadata");
        Ok(true)
    }

    async fn exists(&self, kind: MediaKind, id: &str) -> bool {
        match self.dir_for(kind, id) {
            Some(dir) => is_dir(&dir).await,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_error_becomes_failed_outcome() {
        let error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match removal_outcome(Path::new("/srv/media/images/x"), Err(error)) {
            DeleteOutcome::Failed(reason) => {
                assert!(reason.contains("/srv/media/images/x"));
                assert!(reason.contains("denied"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn removal_success_is_deleted() {
        assert!(removal_outcome(Path::new("x"), Ok(())).is_deleted());
    }
}
