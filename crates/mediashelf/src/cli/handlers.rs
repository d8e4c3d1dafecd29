//! Command handlers.
//!
//! Each handler writes its report to `out` and returns whether the command
//! succeeded, so `main` can pick the exit status.

use super::commands::{Commands, OutputFormat};
use mediashelf_error::{BuilderError, JsonError, MediashelfResult, StorageError, StorageErrorKind};
use mediashelf_storage::{
    CollectionStore, CreateCollection, DeleteOutcome, IngestResponse, MediaKind, UploadedFile,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

fn write_err(e: std::io::Error) -> StorageError {
    StorageError::new(StorageErrorKind::FileWrite(format!("stdout: {}", e)))
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> MediashelfResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| JsonError::new("command output", &e))?;
    writeln!(out, "{}", json).map_err(write_err)?;
    Ok(())
}

/// Dispatch one parsed command against `store`.
pub async fn handle_command(
    store: &dyn CollectionStore,
    command: Commands,
    out: &mut impl Write,
) -> MediashelfResult<bool> {
    match command {
        Commands::List { kind, format } => list_collections(store, kind, format, out).await,
        Commands::Show { kind, id, format } => show_collection(store, kind, &id, format, out).await,
        Commands::Create {
            kind,
            title,
            artist,
            tags,
            description,
            thumbnail,
            files,
        } => {
            let request = build_request(kind, title, artist, tags, description, thumbnail, files)
                .await?;
            create_collection(store, request, out).await
        }
        Commands::Delete { kind, id } => delete_collection(store, kind, &id, out).await,
    }
}

async fn list_collections(
    store: &dyn CollectionStore,
    kind: Option<MediaKind>,
    format: OutputFormat,
    out: &mut impl Write,
) -> MediashelfResult<bool> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![MediaKind::Image, MediaKind::Video],
    };

    for kind in kinds {
        let summaries = store.list(kind).await;
        match format {
            OutputFormat::Json => write_json(out, &summaries)?,
            OutputFormat::Human => {
                writeln!(out, "{} collections:", kind).map_err(write_err)?;
                writeln!(out, "{:-<80}", "").map_err(write_err)?;
                for summary in &summaries {
                    writeln!(
                        out,
                        "{:<30} {:<30} {}",
                        summary.id(),
                        summary.title(),
                        summary.tags().join(", ")
                    )
                    .map_err(write_err)?;
                }
                writeln!(out, "Total: {} collections", summaries.len()).map_err(write_err)?;
            }
        }
    }
    Ok(true)
}

async fn show_collection(
    store: &dyn CollectionStore,
    kind: MediaKind,
    id: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> MediashelfResult<bool> {
    let Some(details) = store.get(kind, id).await else {
        writeln!(out, "No {} collection '{}'", kind, id).map_err(write_err)?;
        return Ok(false);
    };

    match format {
        OutputFormat::Json => write_json(out, &details)?,
        OutputFormat::Human => {
            writeln!(out, "{} ({})", details.title(), details.id()).map_err(write_err)?;
            if !details.artist().is_empty() {
                writeln!(out, "Artist: {}", details.artist()).map_err(write_err)?;
            }
            if !details.tags().is_empty() {
                writeln!(out, "Tags: {}", details.tags().join(", ")).map_err(write_err)?;
            }
            if !details.description().is_empty() {
                writeln!(out, "{}", details.description()).map_err(write_err)?;
            }
            writeln!(out, "Thumbnail: {}", details.thumbnail_url()).map_err(write_err)?;
            writeln!(out, "Files ({}):", details.file_count()).map_err(write_err)?;
            for asset in details.assets() {
                writeln!(out, "  {}", asset).map_err(write_err)?;
            }
        }
    }
    Ok(true)
}

async fn build_request(
    kind: MediaKind,
    title: String,
    artist: String,
    tags: Vec<String>,
    description: String,
    thumbnail: Option<PathBuf>,
    files: Vec<PathBuf>,
) -> MediashelfResult<CreateCollection> {
    let mut assets = Vec::with_capacity(files.len());
    for file in &files {
        assets.push(UploadedFile::from_path(file).await?);
    }
    let thumbnail = match thumbnail {
        Some(path) => Some(UploadedFile::from_path(path).await?),
        None => None,
    };

    let request = CreateCollection::builder()
        .kind(kind)
        .title(title)
        .artist(artist)
        .tags(tags)
        .description(description)
        .assets(assets)
        .thumbnail(thumbnail)
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;
    Ok(request)
}

async fn create_collection(
    store: &dyn CollectionStore,
    request: CreateCollection,
    out: &mut impl Write,
) -> MediashelfResult<bool> {
    let outcome = store.create(request).await;
    write_json(out, &IngestResponse::from(&outcome))?;
    Ok(!outcome.is_failed())
}

async fn delete_collection(
    store: &dyn CollectionStore,
    kind: MediaKind,
    id: &str,
    out: &mut impl Write,
) -> MediashelfResult<bool> {
    let outcome = store.delete(kind, id).await;
    let written = match &outcome {
        DeleteOutcome::Deleted => writeln!(out, "Deleted {} collection '{}'", kind, id),
        DeleteOutcome::NotFound => writeln!(out, "No {} collection '{}'", kind, id),
        DeleteOutcome::Failed(reason) => writeln!(out, "Failed to delete '{}': {}", id, reason),
    };
    written.map_err(write_err)?;
    Ok(outcome.is_deleted())
}
