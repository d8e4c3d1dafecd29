//! Representative-asset selection.

use crate::{AssetScanner, MediaKind, ScannedAsset};
use std::path::Path;

/// Stem a dedicated thumbnail file must carry.
pub const THUMBNAIL_STEM: &str = "thumbnail";

/// One step of the thumbnail policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ThumbnailRule {
    /// A top-level `thumbnail.<image ext>` file, any case
    #[display("dedicated thumbnail")]
    DedicatedThumbnail,
    /// The first asset in scan order
    #[display("first asset")]
    FirstAsset,
}

/// Rules in evaluation order; the first one that yields a file wins.
pub const THUMBNAIL_RULES: [ThumbnailRule; 2] =
    [ThumbnailRule::DedicatedThumbnail, ThumbnailRule::FirstAsset];

impl ThumbnailRule {
    /// Apply this rule to a collection whose sorted assets are `assets`.
    pub fn select(&self, dir: &Path, assets: &[ScannedAsset]) -> Option<ScannedAsset> {
        match self {
            ThumbnailRule::DedicatedThumbnail => dedicated_thumbnail(dir),
            ThumbnailRule::FirstAsset => assets.first().cloned(),
        }
    }
}

/// Whether `path` names a dedicated thumbnail file.
pub(crate) fn is_dedicated_thumbnail(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.eq_ignore_ascii_case(THUMBNAIL_STEM))
        && MediaKind::Image.matches(path)
}

fn dedicated_thumbnail(dir: &Path) -> Option<ScannedAsset> {
    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.path())
        .filter(|path| is_dedicated_thumbnail(path))
        .filter_map(|path| ScannedAsset::new(dir, &path))
        .min()
}

/// Picks the single file that represents a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailResolver;

impl ThumbnailResolver {
    /// Resolve the thumbnail of the collection at `dir`.
    ///
    /// Scans the directory itself; use [`ThumbnailResolver::select`] when the
    /// assets are already at hand.
    pub fn resolve(dir: &Path, kind: MediaKind) -> Option<ScannedAsset> {
        let assets = AssetScanner::scan(dir, kind);
        Self::select(dir, &assets)
    }

    /// Run [`THUMBNAIL_RULES`] in order against pre-scanned `assets`.
    pub fn select(dir: &Path, assets: &[ScannedAsset]) -> Option<ScannedAsset> {
        THUMBNAIL_RULES.iter().find_map(|rule| {
            let picked = rule.select(dir, assets);
            if let Some(asset) = &picked {
                tracing::trace!(rule = %rule, file = %asset.file_name(), "Thumbnail resolved");
            }
            picked
        })
    }
}
