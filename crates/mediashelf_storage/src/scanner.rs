//! Recursive asset enumeration.

use crate::MediaKind;
use derive_getters::Getters;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// An asset file found inside a collection directory.
///
/// Ordering compares the bare file name first and the path relative to the
/// collection second, which is the order listings present assets in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct ScannedAsset {
    /// Final path component, e.g. `001.jpg`
    file_name: String,
    /// Path relative to the collection directory
    relative_path: PathBuf,
    /// Absolute (or root-relative) path on disk
    path: PathBuf,
}

impl ScannedAsset {
    /// Build from a file path inside `collection_dir`.
    pub(crate) fn new(collection_dir: &Path, path: &Path) -> Option<Self> {
        let relative_path = path.strip_prefix(collection_dir).ok()?.to_path_buf();
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            file_name,
            relative_path,
            path: path.to_path_buf(),
        })
    }

    /// Relative path with `/` separators, suitable for a URL.
    pub fn url_path(&self) -> String {
        self.relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Lists the assets of a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetScanner;

impl AssetScanner {
    /// Every file under `dir` whose extension is in `kind`'s allow-list.
    ///
    /// Subdirectories are descended into but never returned. Dotfiles count
    /// like any other file; in-flight writes end in `.tmp` and never match an
    /// allow-list. Entries that cannot be read are skipped. The result is
    /// sorted ascending by file name.
    pub fn scan(dir: &Path, kind: MediaKind) -> Vec<ScannedAsset> {
        let mut assets: Vec<ScannedAsset> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && kind.matches(entry.path()))
            .filter_map(|entry| ScannedAsset::new(dir, entry.path()))
            .collect();

        assets.sort();
        tracing::trace!(dir = %dir.display(), kind = %kind, count = assets.len(), "Scanned assets");
        assets
    }
}
