//! Storage Integration Tests
//!
//! Document round trips, missing/empty/null documents, and fatal
//! handling of malformed content and unknown discriminants.

use studyshelf::{Category, Item, ItemKind, MediaLink, MediaType, Note, PdfDocument, Storage, TextSnippet};
use tempfile::TempDir;

fn storage(dir: &TempDir) -> Storage {
    Storage::new(dir.path())
}

fn sample_items() -> Vec<Item> {
    vec![
        Item::new(
            "Ownership",
            ItemKind::Note(Note {
                content: "Moves and borrows".to_string(),
                is_markdown: true,
            }),
        )
        .with_tag("rust"),
        Item::new(
            "Type Theory",
            ItemKind::Pdf(PdfDocument {
                file_path: "/papers/tapl.pdf".to_string(),
                file_size: 4096,
                page_count: 645,
                author: "Benjamin Pierce".to_string(),
            }),
        ),
        Item::new(
            "Async Talk",
            ItemKind::Media(MediaLink {
                url: "https://youtube.com/watch?v=abc".to_string(),
                media_type: MediaType::Lecture,
                duration_minutes: 75,
                source: "YouTube".to_string(),
            }),
        ),
        Item::new(
            "Quicksort",
            ItemKind::Snippet(TextSnippet {
                content: "fn sort() {}".to_string(),
                language: "rust".to_string(),
                source_url: None,
            }),
        ),
    ]
}

#[tokio::test]
async fn test_load_from_fresh_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    let items = storage.load_items().await.unwrap();
    let categories = storage.load_categories().await.unwrap();

    assert!(items.is_empty());
    assert!(categories.is_empty());

    // The backing files were created, not just tolerated.
    assert!(dir.path().join("library-items.json").exists());
    assert!(dir.path().join("categories.json").exists());
}

#[tokio::test]
async fn test_items_round_trip_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    storage.save_items(&sample_items()).await.unwrap();
    let first = std::fs::read_to_string(dir.path().join("library-items.json")).unwrap();

    let loaded = storage.load_items().await.unwrap();
    assert_eq!(loaded.len(), 4);

    storage.save_items(&loaded).await.unwrap();
    let second = std::fs::read_to_string(dir.path().join("library-items.json")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_categories_round_trip_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    let categories = vec![
        Category::new("Programming").with_description("Code things"),
        Category::new("Math").with_color("#ff8800"),
    ];

    storage.save_categories(&categories).await.unwrap();
    let first = std::fs::read_to_string(dir.path().join("categories.json")).unwrap();

    let loaded = storage.load_categories().await.unwrap();
    assert_eq!(loaded, categories);

    storage.save_categories(&loaded).await.unwrap();
    let second = std::fs::read_to_string(dir.path().join("categories.json")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_timestamps_survive_reload_to_the_second() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    let item = Item::new("Stamped", ItemKind::Note(Note::default()));
    storage.save_items(std::slice::from_ref(&item)).await.unwrap();

    let loaded = storage.load_items().await.unwrap();
    assert_eq!(loaded[0].date_added(), item.date_added());
    assert_eq!(loaded[0].last_modified(), item.last_modified());
}

#[tokio::test]
async fn test_null_document_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    storage.init().await.unwrap();

    std::fs::write(dir.path().join("library-items.json"), "null").unwrap();
    std::fs::write(dir.path().join("categories.json"), "").unwrap();

    assert!(storage.load_items().await.unwrap().is_empty());
    assert!(storage.load_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_document_is_fatal() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    storage.init().await.unwrap();

    std::fs::write(dir.path().join("library-items.json"), "{not json").unwrap();

    let err = storage.load_items().await.unwrap_err();
    // ParseError in the taxonomy: the serde error is preserved in the chain.
    assert!(err.chain().any(|e| e.is::<serde_json::Error>()));
}

#[tokio::test]
async fn test_unknown_discriminant_is_fatal() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    storage.init().await.unwrap();

    let doc = r#"[{"type":"SCROLL","data":{"id":"x","title":"","description":"",
        "tags":[],"dateAdded":"2026-01-01T00:00:00","lastModified":"2026-01-01T00:00:00",
        "itemType":"SCROLL"}}]"#;
    std::fs::write(dir.path().join("library-items.json"), doc).unwrap();

    assert!(storage.load_items().await.is_err());
}

#[tokio::test]
async fn test_save_overwrites_whole_document() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    storage.save_items(&sample_items()).await.unwrap();
    assert_eq!(storage.load_items().await.unwrap().len(), 4);

    let one = vec![Item::new("Only", ItemKind::Note(Note::default()))];
    storage.save_items(&one).await.unwrap();

    let loaded = storage.load_items().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title(), "Only");
}
