//! JSON persistence for the item and category collections.
//!
//! Each collection is one document on disk, rewritten in full on every
//! save. Items travel in `{"type": ..., "data": ...}` envelopes so the
//! variant discriminant is available before the payload is decoded;
//! categories are flat records.
//!
//! Load semantics: a missing file is an empty collection (and gets
//! created), a literal `null` or empty document is an empty collection,
//! and anything that fails to parse is a fatal error with no partial
//! recovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::model::{Category, Item, ItemType};

const ITEMS_FILE: &str = "library-items.json";
const CATEGORIES_FILE: &str = "categories.json";
const EMPTY_DOCUMENT: &str = "[]";

/// Durable storage for the library collections.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Storage rooted at `dir`. Nothing is created until [`Storage::init`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default storage directory (`~/.studyshelf`).
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".studyshelf"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn items_path(&self) -> PathBuf {
        self.dir.join(ITEMS_FILE)
    }

    fn categories_path(&self) -> PathBuf {
        self.dir.join(CATEGORIES_FILE)
    }

    /// Create the storage directory and seed missing documents with
    /// empty collections.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create storage directory: {}", self.dir.display()))?;

        for path in [self.items_path(), self.categories_path()] {
            if !path.exists() {
                debug!(path = %path.display(), "Seeding empty document");
                fs::write(&path, EMPTY_DOCUMENT)
                    .await
                    .with_context(|| format!("Failed to create document: {}", path.display()))?;
            }
        }

        Ok(())
    }

    /// Load all items. Unknown variant discriminants and malformed
    /// documents are fatal.
    pub async fn load_items(&self) -> Result<Vec<Item>> {
        let raw = match self.read_document(&self.items_path()).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        let envelopes: Vec<ItemEnvelope> =
            serde_json::from_str(&raw).context("Failed to parse library items JSON")?;

        envelopes.into_iter().map(ItemEnvelope::into_item).collect()
    }

    /// Serialize every item and overwrite the items document.
    pub async fn save_items(&self, items: &[Item]) -> Result<()> {
        let envelopes: Vec<ItemEnvelope> = items.iter().map(ItemEnvelope::wrap).collect();
        let content = serde_json::to_string_pretty(&envelopes)?;
        self.write_document(&self.items_path(), &content).await
    }

    /// Load all categories. Malformed documents are fatal.
    pub async fn load_categories(&self) -> Result<Vec<Category>> {
        let raw = match self.read_document(&self.categories_path()).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        serde_json::from_str(&raw).context("Failed to parse categories JSON")
    }

    /// Serialize every category and overwrite the categories document.
    pub async fn save_categories(&self, categories: &[Category]) -> Result<()> {
        let content = serde_json::to_string_pretty(categories)?;
        self.write_document(&self.categories_path(), &content).await
    }

    /// Read a document, creating it empty when absent. Returns `None`
    /// for the empty/null markers.
    async fn read_document(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            self.init().await?;
            return Ok(None);
        }

        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read document: {}", path.display()))?;

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        Ok(Some(raw))
    }

    // Full overwrite, no temp-file-then-rename step. A crash mid-write
    // can corrupt the document.
    async fn write_document(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write document: {}", path.display()))?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(())
    }
}

/// Tagged wrapper pairing a variant discriminant with an item payload.
///
/// The payload carries its own `itemType` tag as well; the two must
/// agree or the document is rejected as malformed.
#[derive(Debug, Serialize, Deserialize)]
struct ItemEnvelope {
    #[serde(rename = "type")]
    item_type: ItemType,
    data: Item,
}

impl ItemEnvelope {
    fn wrap(item: &Item) -> Self {
        Self {
            item_type: item.item_type(),
            data: item.clone(),
        }
    }

    fn into_item(self) -> Result<Item> {
        anyhow::ensure!(
            self.item_type == self.data.item_type(),
            "Item envelope type {:?} does not match payload type {:?}",
            self.item_type,
            self.data.item_type(),
        );
        Ok(self.data)
    }
}
