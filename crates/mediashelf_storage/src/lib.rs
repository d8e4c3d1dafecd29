//! Filesystem-backed media collections.
//!
//! Every subdirectory of `{storage_root}/{images|videos}` is a collection: an
//! ordered set of asset files, an optional `thumbnail.<ext>` and an optional
//! `metadata.json` sidecar with the user-authored title, artist, tags and
//! description.
//!
//! # Components
//!
//! - [`slugify`]: title to collection id
//! - [`MetadataStore`]: lenient sidecar reads, atomic sidecar writes
//! - [`AssetScanner`]: recursive, allow-listed, name-sorted asset listing
//! - [`ThumbnailResolver`]: ordered rule table picking one representative file
//! - [`FileSystemCollections`]: list/get/delete/update over the root
//! - [`IngestionPipeline`]: create requests to staged, then published, directories
//! - [`CollectionLocks`]: per-collection mutual exclusion
//!
//! # Example
//!
//! ```rust
//! use mediashelf_storage::{
//!     CollectionStore, CreateCollection, FileSystemCollections, MediaKind, ShelfConfig,
//!     UploadedFile,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemCollections::new(ShelfConfig::new("/tmp/mediashelf")).await?;
//!
//! let request = CreateCollection::builder()
//!     .title("My Collection!!")
//!     .assets(vec![UploadedFile::new(Some("cover.png".into()), vec![1, 2, 3])])
//!     .build()?;
//! let outcome = store.create(request).await;
//! assert_eq!(outcome.id(), Some("My_Collection"));
//!
//! let details = store.get(MediaKind::Image, "My_Collection").await.unwrap();
//! assert_eq!(details.title(), "My Collection!!");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod atomic;
mod config;
mod ingest;
mod kind;
mod locks;
mod metadata;
mod repository;
mod scanner;
mod slug;
mod thumbnail;
mod views;

pub use config::{CollisionPolicy, ShelfConfig};
pub use ingest::{
    CreateCollection, CreateCollectionBuilder, CreateCollectionBuilderError, FailureReason,
    IngestOutcome, IngestResponse, IngestionPipeline, UploadedFile,
};
pub use kind::MediaKind;
pub use locks::CollectionLocks;
pub use mediashelf_error::{MediashelfError, MediashelfResult, StorageError, StorageErrorKind};
pub use metadata::{CollectionMetadata, METADATA_FILE, MetadataStore};
pub use repository::{CollectionStore, DeleteOutcome, FileSystemCollections};
pub use scanner::{AssetScanner, ScannedAsset};
pub use slug::{is_safe_segment, slugify};
pub use thumbnail::{THUMBNAIL_RULES, THUMBNAIL_STEM, ThumbnailResolver, ThumbnailRule};
pub use views::{CollectionDetails, CollectionSummary};
