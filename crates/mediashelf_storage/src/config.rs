//! Storage configuration.
//!
//! Configuration sources, later ones overriding earlier ones:
//! 1. Bundled defaults (`mediashelf.toml` shipped with the crate)
//! 2. `~/.config/mediashelf/mediashelf.toml`
//! 3. `./mediashelf.toml`
//! 4. `MEDIASHELF_*` environment variables (e.g. `MEDIASHELF_STORAGE_ROOT`)

use crate::MediaKind;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use mediashelf_error::{ConfigError, ConfigErrorKind, MediashelfError, MediashelfResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// What creating a collection does when its id is already taken.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail the create with a conflict and leave the existing collection alone
    #[default]
    #[display("reject")]
    Reject,
    /// Write the new files and sidecar into the existing directory
    #[display("merge")]
    Merge,
}

fn default_public_prefix() -> String {
    "/storage".to_string()
}

/// Where collections live and how they are addressed.
///
/// Passed explicitly to every component; nothing reads a global root.
///
/// # Example
///
/// ```
/// use mediashelf_storage::{CollisionPolicy, MediaKind, ShelfConfig};
///
/// let config = ShelfConfig::new("/srv/media").with_collision(CollisionPolicy::Merge);
/// assert_eq!(
///     config.collection_dir(MediaKind::Image, "My_Collection"),
///     std::path::Path::new("/srv/media/images/My_Collection"),
/// );
/// assert_eq!(
///     config.asset_url(MediaKind::Video, "trip", "001.mp4"),
///     "/storage/videos/trip/001.mp4",
/// );
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ShelfConfig {
    /// Directory holding one subdirectory per media kind
    storage_root: PathBuf,

    /// URL prefix the storage root is served under
    #[serde(default = "default_public_prefix")]
    public_prefix: String,

    /// Id collision handling on create
    #[serde(default)]
    collision: CollisionPolicy,
}

impl ShelfConfig {
    /// Configuration rooted at `storage_root` with default settings.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            public_prefix: default_public_prefix(),
            collision: CollisionPolicy::default(),
        }
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> MediashelfResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MediashelfError::from(ConfigError::new(ConfigErrorKind::Source(format!(
                    "{}: {}",
                    path.as_ref().display(),
                    e
                ))))
            })?
            .try_deserialize()
            .map_err(|e| MediashelfError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string()))))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: env > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MediashelfResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        const DEFAULT_CONFIG: &str = include_str!("../../../mediashelf.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/mediashelf/mediashelf.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("mediashelf").required(false))
            .add_source(Environment::with_prefix("MEDIASHELF"));

        let config: Self = builder
            .build()
            .map_err(|e| MediashelfError::from(ConfigError::new(ConfigErrorKind::Source(e.to_string()))))?
            .try_deserialize()
            .map_err(|e| MediashelfError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string()))))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if `storage_root` is empty.
    pub fn validate(&self) -> MediashelfResult<()> {
        if self.storage_root.as_os_str().is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::Invalid {
                field: "storage_root",
                reason: "must not be empty".to_string(),
            })
            .into());
        }
        Ok(())
    }

    /// Directory holding every collection of `kind`.
    pub fn kind_root(&self, kind: MediaKind) -> PathBuf {
        self.storage_root.join(kind.dir_name())
    }

    /// Directory of collection `id`.
    pub fn collection_dir(&self, kind: MediaKind, id: &str) -> PathBuf {
        self.kind_root(kind).join(id)
    }

    /// Public URL of a file inside a collection.
    pub fn asset_url(&self, kind: MediaKind, id: &str, relative: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.public_prefix.trim_end_matches('/'),
            kind.dir_name(),
            id,
            relative
        )
    }
}
