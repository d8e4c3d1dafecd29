//! Materializing create requests into collection directories.

use crate::atomic::write_atomic;
use crate::thumbnail::{THUMBNAIL_STEM, is_dedicated_thumbnail};
use crate::{
    CollectionLocks, CollectionMetadata, CollisionPolicy, MediaKind, MetadataStore, ShelfConfig,
    slugify,
};
use derive_getters::Getters;
use mediashelf_error::{
    MediashelfError, MediashelfErrorKind, MediashelfResult, StorageError, StorageErrorKind,
    ValidationError, ValidationErrorKind,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// An uploaded file: its original name (if the client sent one) and bytes.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct UploadedFile {
    filename: Option<String>,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// Wrap an in-memory upload.
    pub fn new(filename: Option<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename,
            bytes: bytes.into(),
        }
    }

    /// Read a local file, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> MediashelfResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self { filename, bytes })
    }

    /// Whether the upload carries no data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased text after the last `.` of the original name, or `default`.
    ///
    /// A leading dot counts, so an upload named `.png` yields `png`.
    pub fn extension_or(&self, default: &str) -> String {
        self.filename
            .as_deref()
            .and_then(|name| Path::new(name).file_name())
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| default.to_string())
    }

    fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<unnamed>")
    }
}

/// Request to create a collection.
///
/// # Example
///
/// ```
/// use mediashelf_storage::{CreateCollection, MediaKind, UploadedFile};
///
/// let request = CreateCollection::builder()
///     .title("My Collection!!")
///     .artist("Kim")
///     .tags(vec!["summer".to_string()])
///     .assets(vec![UploadedFile::new(Some("a.png".into()), b"png".to_vec())])
///     .build()
///     .unwrap();
/// assert_eq!(*request.kind(), MediaKind::Image);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CreateCollection {
    /// Kind of media being uploaded
    #[builder(default)]
    kind: MediaKind,
    /// Human title; the id is derived from it
    title: String,
    /// Artist credit
    #[builder(default)]
    artist: String,
    /// Tags, trimmed on ingestion
    #[builder(default)]
    tags: Vec<String>,
    /// Free-form description
    #[builder(default)]
    description: String,
    /// Assets in presentation order
    #[builder(default)]
    assets: Vec<UploadedFile>,
    /// Optional dedicated thumbnail image
    #[builder(default)]
    thumbnail: Option<UploadedFile>,
}

impl CreateCollection {
    /// Creates a new request builder.
    pub fn builder() -> CreateCollectionBuilder {
        CreateCollectionBuilder::default()
    }
}

/// Why a create failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
    /// The request was rejected before touching the filesystem
    #[display("validation")]
    Validation,
    /// The id is already taken and the collision policy rejects duplicates
    #[display("conflict")]
    Conflict,
    /// A directory or file could not be written
    #[display("storage")]
    Storage,
}

/// Result of a create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The collection was written
    Created {
        /// Id of the new (or merged) collection
        id: String,
        /// Human-readable confirmation
        message: String,
    },
    /// Nothing usable was written
    Failed {
        /// Human-readable failure description
        message: String,
        /// Failure class
        reason: FailureReason,
    },
}

impl IngestOutcome {
    fn created(id: String) -> Self {
        let message = format!("Collection created. ID: {}", id);
        IngestOutcome::Created { id, message }
    }

    fn failed(error: &MediashelfError) -> Self {
        let reason = match error.kind() {
            MediashelfErrorKind::Validation(_) => FailureReason::Validation,
            _ if error.is_conflict() => FailureReason::Conflict,
            _ => FailureReason::Storage,
        };
        IngestOutcome::Failed {
            message: format!("Failed to create collection: {}", error.summary()),
            reason,
        }
    }

    /// Id of the created collection, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            IngestOutcome::Created { id, .. } => Some(id),
            IngestOutcome::Failed { .. } => None,
        }
    }

    /// Whether the create failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, IngestOutcome::Failed { .. })
    }
}

/// Wire shape of an [`IngestOutcome`]: the status travels in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Id of the created collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable result
    pub message: String,
    /// `true` on success
    pub status: bool,
    /// `true` on failure
    pub failed: bool,
    /// Failure class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl From<&IngestOutcome> for IngestResponse {
    fn from(outcome: &IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Created { id, message } => Self {
                id: Some(id.clone()),
                message: message.clone(),
                status: true,
                failed: false,
                reason: None,
            },
            IngestOutcome::Failed { message, reason } => Self {
                id: None,
                message: message.clone(),
                status: false,
                failed: true,
                reason: Some(*reason),
            },
        }
    }
}

/// A validated request: every name and byte that will be written.
#[derive(Debug)]
struct IngestPlan {
    kind: MediaKind,
    id: String,
    files: Vec<(String, Vec<u8>)>,
    thumbnail: Option<(String, Vec<u8>)>,
    metadata: CollectionMetadata,
}

impl IngestPlan {
    fn from_request(request: CreateCollection) -> MediashelfResult<Self> {
        let CreateCollection {
            kind,
            title,
            artist,
            tags,
            description,
            assets,
            thumbnail,
        } = request;

        if title.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::BlankTitle).into());
        }
        let id = slugify(&title);
        if id.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptySlug(title)).into());
        }
        if assets.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::NoAssets).into());
        }
        if assets.iter().all(UploadedFile::is_empty) {
            return Err(ValidationError::new(ValidationErrorKind::EmptyAssets(assets.len())).into());
        }

        // Empty uploads are skipped but keep their position in the numbering.
        let mut files = Vec::with_capacity(assets.len());
        for (index, asset) in assets.into_iter().enumerate() {
            if asset.is_empty() {
                tracing::debug!(index, file = asset.display_name(), "Skipping empty asset");
                continue;
            }
            let extension = checked_extension(&asset, kind)?;
            files.push((format!("{:03}.{}", index + 1, extension), asset.bytes));
        }

        let thumbnail = match thumbnail.filter(|t| !t.is_empty()) {
            Some(upload) => {
                let extension = checked_extension(&upload, MediaKind::Image)?;
                Some((format!("{}.{}", THUMBNAIL_STEM, extension), upload.bytes))
            }
            None => None,
        };

        let tags = tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            kind,
            id,
            files,
            thumbnail,
            metadata: CollectionMetadata {
                title,
                artist,
                tags,
                description,
            },
        })
    }
}

fn checked_extension(upload: &UploadedFile, kind: MediaKind) -> MediashelfResult<String> {
    let extension = upload.extension_or(kind.default_extension());
    if kind.allows_extension(&extension) {
        Ok(extension)
    } else {
        Err(ValidationError::new(ValidationErrorKind::UnsupportedExtension {
            kind: kind.to_string(),
            extension,
            filename: upload.display_name().to_string(),
        })
        .into())
    }
}

/// Turns create requests into collection directories.
///
/// New collections are assembled in a hidden staging directory next to
/// their final location and published with one rename, so readers never see
/// a half-written new collection. Merges into an existing directory write in
/// place, one atomic file at a time.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    config: Arc<ShelfConfig>,
    locks: CollectionLocks,
}

impl IngestionPipeline {
    /// Create a pipeline writing under `config`'s root and serializing on `locks`.
    pub fn new(config: Arc<ShelfConfig>, locks: CollectionLocks) -> Self {
        Self { config, locks }
    }

    /// Validate and write `request`, reporting any failure as an outcome.
    #[tracing::instrument(skip(self, request), fields(kind = %request.kind, title = %request.title))]
    pub async fn ingest(&self, request: CreateCollection) -> IngestOutcome {
        match self.try_ingest(request).await {
            Ok(id) => {
                tracing::info!(id = %id, "Created collection");
                IngestOutcome::created(id)
            }
            Err(e) => {
                if e.is_validation() || e.is_conflict() {
                    tracing::warn!(error = %e, "Rejected collection");
                } else {
                    tracing::error!(error = %e, "Failed to create collection");
                }
                IngestOutcome::failed(&e)
            }
        }
    }

    async fn try_ingest(&self, request: CreateCollection) -> MediashelfResult<String> {
        let plan = IngestPlan::from_request(request)?;

        let kind_root = self.config.kind_root(plan.kind);
        tokio::fs::create_dir_all(&kind_root).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                kind_root.display(),
                e
            )))
        })?;

        let _guard = self.locks.acquire(plan.kind, &plan.id).await;
        let target = self.config.collection_dir(plan.kind, &plan.id);
        let exists = tokio::fs::try_exists(&target).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", target.display(), e)))
        })?;

        let written = match (exists, *self.config.collision()) {
            (true, CollisionPolicy::Reject) => Err(MediashelfError::from(StorageError::new(
                StorageErrorKind::Conflict(plan.id.clone()),
            ))),
            (true, CollisionPolicy::Merge) => {
                tracing::debug!(id = %plan.id, "Merging into existing collection");
                write_contents(&target, &plan).await.inspect_err(|_| {
                    tracing::error!(
                        dir = %target.display(),
                        "Merge interrupted; collection may hold a mix of old and new files"
                    );
                })
            }
            (false, _) => publish_staged(&kind_root, &target, &plan).await,
        };
        written?;

        Ok(plan.id)
    }
}

async fn publish_staged(kind_root: &Path, target: &Path, plan: &IngestPlan) -> MediashelfResult<()> {
    let staging: PathBuf = kind_root.join(format!(".staging-{}", Uuid::new_v4()));
    tokio::fs::create_dir(&staging).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            staging.display(),
            e
        )))
    })?;

    let published = async {
        write_contents(&staging, plan).await?;
        tokio::fs::rename(&staging, target).await.map_err(|e| {
            MediashelfError::from(StorageError::new(StorageErrorKind::FileWrite(format!(
                "publish {} as {}: {}",
                staging.display(),
                target.display(),
                e
            ))))
        })
    }
    .await;

    if published.is_err() {
        if let Err(e) = tokio::fs::remove_dir_all(&staging).await {
            tracing::warn!(dir = %staging.display(), error = %e, "Failed to clean up staging directory");
        }
    }
    published
}

async fn write_contents(dir: &Path, plan: &IngestPlan) -> MediashelfResult<()> {
    for (name, bytes) in &plan.files {
        write_atomic(&dir.join(name), bytes).await?;
    }

    if let Some((name, bytes)) = &plan.thumbnail {
        write_atomic(&dir.join(name), bytes).await?;
        remove_other_thumbnails(dir, name).await?;
    }

    MetadataStore::put(dir, &plan.metadata).await?;

    tracing::debug!(
        dir = %dir.display(),
        files = plan.files.len(),
        thumbnail = plan.thumbnail.is_some(),
        "Wrote collection contents"
    );
    Ok(())
}

/// Remove dedicated thumbnails other than `keep` so only one remains.
///
/// Runs after `keep` is written; a failed write leaves the previous one.
async fn remove_other_thumbnails(dir: &Path, keep: &str) -> MediashelfResult<()> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", dir.display(), e)))
    })?;

    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", dir.display(), e)))
    })? {
        let path = entry.path();
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
        if is_file && entry.file_name().to_str() != Some(keep) && is_dedicated_thumbnail(&path) {
            tokio::fs::remove_file(&path).await.map_err(|e| {
                StorageError::new(StorageErrorKind::Removal(format!("{}: {}", path.display(), e)))
            })?;
            tracing::debug!(path = %path.display(), "Replaced previous thumbnail");
        }
    }
    Ok(())
}
