//! Temp-file-then-rename writes.

use mediashelf_error::{MediashelfResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Sibling path used while `path` is being written.
///
/// Hidden and suffixed `.tmp` so neither the asset scanner nor the
/// thumbnail resolver can pick it up.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
}

/// Write `data` to `path` so readers see either the old file or the new one.
///
/// The temporary file lives in the same directory, which keeps the final
/// rename on one filesystem.
pub(crate) async fn write_atomic(path: &Path, data: &[u8]) -> MediashelfResult<()> {
    let temp_path = temp_path_for(path);

    tokio::fs::write(&temp_path, data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
            tracing::warn!(
                path = %temp_path.display(),
                error = %cleanup,
                "Failed to remove temporary file"
            );
        }
        return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
        .into());
    }

    tracing::trace!(path = %path.display(), size = data.len(), "Wrote file");
    Ok(())
}
