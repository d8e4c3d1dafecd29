//! Media kind enumeration and extension allow-lists.

use serde::{Deserialize, Serialize};
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "webm"];

/// Kind of media a collection holds.
///
/// Each kind owns one subdirectory of the storage root and an extension
/// allow-list that decides which files count as assets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still images (JPEG, PNG, GIF, WebP, SVG)
    #[default]
    #[display("image")]
    Image,
    /// Videos (MP4, AVI, MKV, MOV, WebM)
    #[display("video")]
    Video,
}

impl MediaKind {
    /// String form used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Name of the subdirectory under the storage root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Lowercase extensions accepted as assets of this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Video => VIDEO_EXTENSIONS,
        }
    }

    /// Extension given to an upload whose filename carries none.
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }

    /// Case-insensitive allow-list check.
    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        self.extensions().contains(&extension.as_str())
    }

    /// Whether `path` carries an extension from this kind's allow-list.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediashelf_storage::MediaKind;
    /// use std::path::Path;
    ///
    /// assert!(MediaKind::Image.matches(Path::new("IMG.JPG")));
    /// assert!(!MediaKind::Image.matches(Path::new("img.txt")));
    /// assert!(MediaKind::Video.matches(Path::new("clip.webm")));
    /// ```
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.allows_extension(ext))
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "images" => Ok(MediaKind::Image),
            "video" | "videos" => Ok(MediaKind::Video),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}
