//! Tests for the filesystem collection repository.

use mediashelf_storage::{
    CollectionMetadata, CollectionStore, CreateCollection, DeleteOutcome, FileSystemCollections,
    MediaKind, MetadataStore, ShelfConfig, UploadedFile,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn touch(dir: &Path, relative: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"data").unwrap();
}

async fn open(temp_dir: &TempDir) -> FileSystemCollections {
    FileSystemCollections::new(ShelfConfig::new(temp_dir.path()))
        .await
        .unwrap()
}

fn request(title: &str) -> CreateCollection {
    CreateCollection::builder()
        .title(title)
        .assets(vec![UploadedFile::new(
            Some("photo.jpg".to_string()),
            b"pixels".to_vec(),
        )])
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_new_creates_kind_directories() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("nested/root");
    FileSystemCollections::new(ShelfConfig::new(&root))
        .await
        .unwrap();

    assert!(root.join("images").is_dir());
    assert!(root.join("videos").is_dir());
}

#[tokio::test]
async fn test_new_rejects_empty_root() {
    let result = FileSystemCollections::new(ShelfConfig::new("")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_is_sorted_and_hides_empty_collections() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    let images = temp_dir.path().join("images");

    touch(&images, "zeta/001.jpg");
    touch(&images, "alpha/001.png");
    touch(&images, "only_text/readme.txt");
    fs::create_dir_all(images.join("empty")).unwrap();
    touch(&images, "stray.jpg");

    let ids: Vec<_> = store
        .list(MediaKind::Image)
        .await
        .iter()
        .map(|summary| summary.id().clone())
        .collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn test_list_falls_back_to_id_without_sidecar() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    let images = temp_dir.path().join("images");

    touch(&images, "bare/001.jpg");
    touch(&images, "broken/001.jpg");
    fs::write(images.join("broken/metadata.json"), b"nope").unwrap();

    let summaries = store.list(MediaKind::Image).await;
    assert_eq!(summaries.len(), 2);
    for summary in &summaries {
        assert_eq!(summary.title(), summary.id());
        assert!(summary.artist().is_empty());
        assert!(summary.tags().is_empty());
    }
}

#[tokio::test]
async fn test_list_is_per_kind() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    touch(&temp_dir.path().join("videos"), "trip/001.mp4");

    assert!(store.list(MediaKind::Image).await.is_empty());
    let videos = store.list(MediaKind::Video).await;
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].thumbnail_url(), "/storage/videos/trip/001.mp4");
}

#[tokio::test]
async fn test_get_returns_details() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    let dir = temp_dir.path().join("images/Holiday");

    touch(&dir, "002.jpg");
    touch(&dir, "001.png");
    touch(&dir, "extras/000.gif");
    touch(&dir, "thumbnail.webp");
    MetadataStore::put(
        &dir,
        &CollectionMetadata {
            title: "Holiday!".to_string(),
            artist: "Lee".to_string(),
            tags: vec!["sea".to_string()],
            description: "Sunny".to_string(),
        },
    )
    .await
    .unwrap();

    let details = store.get(MediaKind::Image, "Holiday").await.unwrap();
    assert_eq!(details.id(), "Holiday");
    assert_eq!(details.title(), "Holiday!");
    assert_eq!(details.artist(), "Lee");
    assert_eq!(details.description(), "Sunny");
    assert_eq!(
        details.thumbnail_url(),
        "/storage/images/Holiday/thumbnail.webp"
    );
    assert_eq!(*details.file_count(), 4);
    assert_eq!(
        details.assets(),
        &vec![
            "/storage/images/Holiday/extras/000.gif".to_string(),
            "/storage/images/Holiday/001.png".to_string(),
            "/storage/images/Holiday/002.jpg".to_string(),
            "/storage/images/Holiday/thumbnail.webp".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_get_unknown_or_unsafe_id_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    touch(temp_dir.path(), "outside/001.jpg");
    fs::create_dir_all(temp_dir.path().join("images/empty")).unwrap();

    assert!(store.get(MediaKind::Image, "missing").await.is_none());
    assert!(store.get(MediaKind::Image, "empty").await.is_none());
    assert!(store.get(MediaKind::Image, "../outside").await.is_none());
    assert!(store.get(MediaKind::Image, "..").await.is_none());
    assert!(store.get(MediaKind::Image, "").await.is_none());
}

#[tokio::test]
async fn test_delete_nonexistent_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert!(!store.create(request("Keep Me")).await.is_failed());

    assert_eq!(
        store.delete(MediaKind::Image, "nonexistent").await,
        DeleteOutcome::NotFound
    );
    assert_eq!(
        store.delete(MediaKind::Image, "../images").await,
        DeleteOutcome::NotFound
    );
    assert!(store.exists(MediaKind::Image, "Keep_Me").await);
    assert_eq!(store.list(MediaKind::Image).await.len(), 1);
}

#[tokio::test]
async fn test_delete_removes_whole_tree() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert!(!store.create(request("Gone Soon")).await.is_failed());
    touch(&temp_dir.path().join("images/Gone_Soon"), "nested/extra.jpg");

    assert!(
        store
            .delete(MediaKind::Image, "Gone_Soon")
            .await
            .is_deleted()
    );
    assert!(!temp_dir.path().join("images/Gone_Soon").exists());
    assert!(store.get(MediaKind::Image, "Gone_Soon").await.is_none());
    assert_eq!(
        store.delete(MediaKind::Image, "Gone_Soon").await,
        DeleteOutcome::NotFound
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_removal_is_reported() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert!(!store.create(request("Stuck")).await.is_failed());

    let sealed = temp_dir.path().join("images/Stuck/sealed");
    touch(&sealed, "inner.jpg");
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can remove entries regardless of mode bits.
    let enforced = fs::write(sealed.join("check"), b"").is_err();
    let _ = fs::remove_file(sealed.join("check"));

    let outcome = store.delete(MediaKind::Image, "Stuck").await;
    if enforced {
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
        match outcome {
            DeleteOutcome::Failed(reason) => assert!(reason.contains("Stuck")),
            other => panic!("expected a failed removal, got {:?}", other),
        }
        // The rest of the tree is still addressable.
        assert!(store.exists(MediaKind::Image, "Stuck").await);
    } else {
        assert!(outcome.is_deleted());
    }
}

#[tokio::test]
async fn test_delete_is_scoped_to_kind() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert!(!store.create(request("Shared")).await.is_failed());

    assert_eq!(
        store.delete(MediaKind::Video, "Shared").await,
        DeleteOutcome::NotFound
    );
    assert!(store.exists(MediaKind::Image, "Shared").await);
}

#[tokio::test]
async fn test_update_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert!(!store.create(request("Renamed")).await.is_failed());

    let replacement = CollectionMetadata::new("A brand new title");
    assert!(
        store
            .update_metadata(MediaKind::Image, "Renamed", &replacement)
            .await
            .unwrap()
    );
    let details = store.get(MediaKind::Image, "Renamed").await.unwrap();
    assert_eq!(details.title(), "A brand new title");

    assert!(
        !store
            .update_metadata(MediaKind::Image, "absent", &replacement)
            .await
            .unwrap()
    );
    assert!(!temp_dir.path().join("images/absent").exists());
}

#[tokio::test]
async fn test_exists() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert!(!store.exists(MediaKind::Image, "Here").await);

    assert!(!store.create(request("Here")).await.is_failed());
    assert!(store.exists(MediaKind::Image, "Here").await);
    assert!(!store.exists(MediaKind::Video, "Here").await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_and_delete_stay_consistent() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(open(&temp_dir).await);

    for _ in 0..20 {
        let creator = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.create(request("Racing")).await })
        };
        let deleter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.delete(MediaKind::Image, "Racing").await })
        };

        let (created, deleted) = (creator.await.unwrap(), deleter.await.unwrap());
        assert!(!created.is_failed());

        let dir = temp_dir.path().join("images/Racing");
        if deleted.is_deleted() {
            // Delete ran after the create published.
            assert!(!dir.exists());
        } else {
            assert_eq!(deleted, DeleteOutcome::NotFound);
            let details = store.get(MediaKind::Image, "Racing").await.unwrap();
            assert_eq!(*details.file_count(), 1);
            assert_eq!(details.title(), "Racing");
            store.delete(MediaKind::Image, "Racing").await;
        }

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path().join("images"))
            .unwrap()
            .collect();
        assert!(leftovers.is_empty());
    }
}

#[tokio::test]
async fn test_store_is_usable_as_trait_object() {
    let temp_dir = TempDir::new().unwrap();
    let store: Box<dyn CollectionStore> = Box::new(open(&temp_dir).await);

    assert!(!store.create(request("Dyn")).await.is_failed());
    assert_eq!(store.list(MediaKind::Image).await.len(), 1);
}
