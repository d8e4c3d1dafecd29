//! Read-side views of a collection.

use crate::{CollectionMetadata, MediaKind, ScannedAsset, ShelfConfig};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One entry of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    /// Collection id (directory name)
    id: String,
    /// Title from the sidecar, or the id when there is none
    title: String,
    /// Artist credit
    artist: String,
    /// Ordered tags
    tags: Vec<String>,
    /// URL of the representative file
    thumbnail_url: String,
}

impl CollectionSummary {
    pub(crate) fn assemble(
        config: &ShelfConfig,
        kind: MediaKind,
        id: &str,
        thumbnail: &ScannedAsset,
        metadata: Option<CollectionMetadata>,
    ) -> Self {
        let metadata = metadata.unwrap_or_else(|| CollectionMetadata::new(id));
        Self {
            id: id.to_string(),
            title: metadata.title,
            artist: metadata.artist,
            tags: metadata.tags,
            thumbnail_url: config.asset_url(kind, id, &thumbnail.url_path()),
        }
    }
}

/// Full view of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetails {
    /// Collection id (directory name)
    id: String,
    /// Title from the sidecar, or the id when there is none
    title: String,
    /// Artist credit
    artist: String,
    /// Ordered tags
    tags: Vec<String>,
    /// Free-form description
    description: String,
    /// URL of the representative file
    thumbnail_url: String,
    /// Number of assets found by a recursive scan
    file_count: usize,
    /// Asset URLs in scan order
    assets: Vec<String>,
}

impl CollectionDetails {
    pub(crate) fn assemble(
        config: &ShelfConfig,
        kind: MediaKind,
        id: &str,
        assets: &[ScannedAsset],
        thumbnail: &ScannedAsset,
        metadata: Option<CollectionMetadata>,
    ) -> Self {
        let metadata = metadata.unwrap_or_else(|| CollectionMetadata::new(id));
        Self {
            id: id.to_string(),
            title: metadata.title,
            artist: metadata.artist,
            tags: metadata.tags,
            description: metadata.description,
            thumbnail_url: config.asset_url(kind, id, &thumbnail.url_path()),
            file_count: assets.len(),
            assets: assets
                .iter()
                .map(|asset| config.asset_url(kind, id, &asset.url_path()))
                .collect(),
        }
    }
}
