//! Tests for asset scanning and thumbnail resolution.

use mediashelf_storage::{AssetScanner, MediaKind, ThumbnailResolver, ThumbnailRule};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(dir: &Path, relative: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"data").unwrap();
}

fn names(dir: &Path, kind: MediaKind) -> Vec<String> {
    AssetScanner::scan(dir, kind)
        .iter()
        .map(|asset| asset.file_name().clone())
        .collect()
}

#[test]
fn test_scan_sorts_by_file_name() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["010.jpg", "002.png", "001.gif", "100.webp"] {
        touch(temp_dir.path(), name);
    }

    assert_eq!(
        names(temp_dir.path(), MediaKind::Image),
        vec!["001.gif", "002.png", "010.jpg", "100.webp"]
    );
}

#[test]
fn test_scan_filters_extensions_case_insensitively() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "IMG.JPG");
    touch(temp_dir.path(), "img.txt");
    touch(temp_dir.path(), "metadata.json");
    touch(temp_dir.path(), "clip.mp4");

    assert_eq!(names(temp_dir.path(), MediaKind::Image), vec!["IMG.JPG"]);
    assert_eq!(names(temp_dir.path(), MediaKind::Video), vec!["clip.mp4"]);
}

#[test]
fn test_scan_recurses_and_never_returns_directories() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "b.jpg");
    touch(temp_dir.path(), "nested/deeper/a.png");
    fs::create_dir_all(temp_dir.path().join("folder.jpg")).unwrap();

    let assets = AssetScanner::scan(temp_dir.path(), MediaKind::Image);
    let names: Vec<_> = assets.iter().map(|a| a.file_name().as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.jpg"]);
    assert_eq!(assets[0].url_path(), "nested/deeper/a.png");
}

#[test]
fn test_scan_includes_dotfiles_but_not_temp_files() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "001.jpg");
    touch(temp_dir.path(), ".cover.jpg");
    touch(temp_dir.path(), ".001.jpg.0f3a.tmp");
    touch(temp_dir.path(), ".extras/002.jpg");

    assert_eq!(
        names(temp_dir.path(), MediaKind::Image),
        vec![".cover.jpg", "001.jpg", "002.jpg"]
    );
}

#[test]
fn test_dotfile_alone_still_resolves_a_thumbnail() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), ".cover.jpg");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).unwrap();
    assert_eq!(thumbnail.file_name(), ".cover.jpg");
}

#[cfg(unix)]
#[test]
fn test_scan_skips_unreadable_directories() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "a.jpg");
    touch(temp_dir.path(), "locked/inside.jpg");
    touch(temp_dir.path(), "open/b.jpg");

    let locked = temp_dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users read through the mode bits.
    let enforced = fs::read_dir(&locked).is_err();

    let found = names(temp_dir.path(), MediaKind::Image);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if enforced {
        assert_eq!(found, vec!["a.jpg", "b.jpg"]);
    } else {
        assert_eq!(found, vec!["a.jpg", "b.jpg", "inside.jpg"]);
    }
}

#[test]
fn test_scan_is_stable_across_calls() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["c.jpg", "a.jpg", "sub/a.jpg", "b.jpg"] {
        touch(temp_dir.path(), name);
    }

    let first = AssetScanner::scan(temp_dir.path(), MediaKind::Image);
    let second = AssetScanner::scan(temp_dir.path(), MediaKind::Image);
    assert_eq!(first, second);
    // Equal names are ordered by relative path.
    assert_eq!(first[0].url_path(), "a.jpg");
    assert_eq!(first[1].url_path(), "sub/a.jpg");
}

#[test]
fn test_scan_of_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    assert!(AssetScanner::scan(&temp_dir.path().join("absent"), MediaKind::Image).is_empty());
}

#[test]
fn test_dedicated_thumbnail_wins() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "thumbnail.png");
    touch(temp_dir.path(), "000.jpg");
    touch(temp_dir.path(), "001.jpg");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).unwrap();
    assert_eq!(thumbnail.file_name(), "thumbnail.png");
}

#[test]
fn test_dedicated_thumbnail_matches_any_case() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "001.jpg");
    touch(temp_dir.path(), "Thumbnail.WEBP");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).unwrap();
    assert_eq!(thumbnail.file_name(), "Thumbnail.WEBP");
}

#[test]
fn test_falls_back_to_first_asset() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "b.png");
    touch(temp_dir.path(), "a.jpg");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).unwrap();
    assert_eq!(thumbnail.file_name(), "a.jpg");
}

#[test]
fn test_nested_thumbnail_file_is_not_dedicated() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "sub/thumbnail.png");
    touch(temp_dir.path(), "z.jpg");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).unwrap();
    // Found by the recursive fallback instead, and "thumbnail.png" < "z.jpg".
    assert_eq!(thumbnail.url_path(), "sub/thumbnail.png");
    assert!(
        ThumbnailRule::DedicatedThumbnail
            .select(temp_dir.path(), &[])
            .is_none()
    );
}

#[test]
fn test_thumbnail_with_text_extension_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "thumbnail.txt");
    touch(temp_dir.path(), "001.jpg");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).unwrap();
    assert_eq!(thumbnail.file_name(), "001.jpg");
}

#[test]
fn test_video_collection_uses_image_thumbnail_or_first_video() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "001.mp4");
    touch(temp_dir.path(), "002.mkv");

    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Video).unwrap();
    assert_eq!(thumbnail.file_name(), "001.mp4");

    touch(temp_dir.path(), "thumbnail.jpg");
    let thumbnail = ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Video).unwrap();
    assert_eq!(thumbnail.file_name(), "thumbnail.jpg");
}

#[test]
fn test_no_qualifying_file_resolves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "notes.txt");
    touch(temp_dir.path(), "metadata.json");

    assert!(ThumbnailResolver::resolve(temp_dir.path(), MediaKind::Image).is_none());
}
