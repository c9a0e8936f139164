//! The library service: canonical in-memory indexes with write-through
//! persistence.
//!
//! A [`Library`] is constructed once by the application entry point and
//! shared by reference. Both collections live in id-keyed maps behind a
//! single read-write lock: mutations hold the write lock across the
//! "mutate index, then persist" pair, so two writers can never
//! interleave a full-document overwrite; reads take the read lock and
//! clone snapshots out, so callers always observe a consistent index
//! and can never corrupt internal state.
//!
//! All multi-result reads return items in ascending id order (the map's
//! iteration order); `all_tags` is sorted lexicographically.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::model::{normalize_tag, Category, Item, ItemType};
use crate::search::SearchCriteria;
use crate::storage::Storage;

#[derive(Default)]
struct State {
    items: BTreeMap<String, Item>,
    categories: BTreeMap<String, Category>,
}

/// Sole entry point for reading and mutating the library.
pub struct Library {
    storage: Storage,
    state: RwLock<State>,
}

impl Library {
    /// Initialize storage and load both collections into memory.
    ///
    /// Fails on unreadable or malformed documents; a fresh directory
    /// loads as an empty library.
    pub async fn open(storage: Storage) -> Result<Self> {
        storage.init().await?;

        let mut state = State::default();
        for category in storage.load_categories().await? {
            state.categories.insert(category.id().to_string(), category);
        }
        for item in storage.load_items().await? {
            state.items.insert(item.id().to_string(), item);
        }

        info!(
            dir = %storage.dir().display(),
            items = state.items.len(),
            categories = state.categories.len(),
            "Opened library"
        );

        Ok(Self {
            storage,
            state: RwLock::new(state),
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // Item operations

    /// Insert an item, overwriting any existing item with the same id,
    /// and persist. An item with a blank id is silently ignored.
    pub async fn add_item(&self, item: Item) -> Result<()> {
        if item.id().trim().is_empty() {
            debug!("Ignoring item with blank id");
            return Ok(());
        }

        let mut state = self.state.write().await;
        state.items.insert(item.id().to_string(), item);
        self.persist_items(&state).await
    }

    /// Touch and replace an existing item, then persist. Unknown ids
    /// are silently ignored (update never inserts).
    pub async fn update_item(&self, mut item: Item) -> Result<()> {
        let mut state = self.state.write().await;
        if item.id().trim().is_empty() || !state.items.contains_key(item.id()) {
            debug!(id = item.id(), "Ignoring update for unknown item");
            return Ok(());
        }

        item.touch();
        state.items.insert(item.id().to_string(), item);
        self.persist_items(&state).await
    }

    /// Remove an item and persist. Unknown ids are a no-op.
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.items.remove(id).is_none() {
            return Ok(());
        }
        self.persist_items(&state).await
    }

    pub async fn item(&self, id: &str) -> Option<Item> {
        self.state.read().await.items.get(id).cloned()
    }

    /// Every item, ascending by id.
    pub async fn all_items(&self) -> Vec<Item> {
        self.state.read().await.items.values().cloned().collect()
    }

    /// Free-text search. A blank query returns every item.
    pub async fn search_items(&self, query: &str) -> Vec<Item> {
        self.search(&SearchCriteria::text(query)).await
    }

    /// Evaluate full criteria against every item.
    pub async fn search(&self, criteria: &SearchCriteria) -> Vec<Item> {
        self.state
            .read()
            .await
            .items
            .values()
            .filter(|item| criteria.matches(item))
            .cloned()
            .collect()
    }

    /// Items in a category (by id). `None` returns every item.
    pub async fn items_by_category(&self, category: Option<&Category>) -> Vec<Item> {
        let state = self.state.read().await;
        match category {
            None => state.items.values().cloned().collect(),
            Some(category) => state
                .items
                .values()
                .filter(|item| item.category() == Some(category))
                .cloned()
                .collect(),
        }
    }

    /// Items carrying a tag. `None` or a blank tag returns every item.
    pub async fn items_by_tag(&self, tag: Option<&str>) -> Vec<Item> {
        let state = self.state.read().await;
        let normalized = tag.map(normalize_tag).unwrap_or_default();
        if normalized.is_empty() {
            return state.items.values().cloned().collect();
        }
        state
            .items
            .values()
            .filter(|item| item.has_tag(&normalized))
            .cloned()
            .collect()
    }

    /// Items of one variant. `None` returns every item.
    pub async fn items_by_type(&self, item_type: Option<ItemType>) -> Vec<Item> {
        let state = self.state.read().await;
        match item_type {
            None => state.items.values().cloned().collect(),
            Some(item_type) => state
                .items
                .values()
                .filter(|item| item.item_type() == item_type)
                .cloned()
                .collect(),
        }
    }

    /// Sorted, deduplicated union of every item's tags.
    pub async fn all_tags(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut tags = BTreeSet::new();
        for item in state.items.values() {
            tags.extend(item.tags().iter().cloned());
        }
        tags.into_iter().collect()
    }

    /// Total item count, computed by scanning the index.
    pub async fn item_count(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Count of items of one variant, computed by scanning the index.
    pub async fn item_count_by_type(&self, item_type: ItemType) -> usize {
        self.state
            .read()
            .await
            .items
            .values()
            .filter(|item| item.item_type() == item_type)
            .count()
    }

    // Category operations

    /// Insert a category, overwriting any existing category with the
    /// same id, and persist. A blank id is silently ignored.
    pub async fn add_category(&self, category: Category) -> Result<()> {
        if category.id().trim().is_empty() {
            debug!("Ignoring category with blank id");
            return Ok(());
        }

        let mut state = self.state.write().await;
        state.categories.insert(category.id().to_string(), category);
        self.persist_categories(&state).await
    }

    /// Replace an existing category, then persist. Unknown ids are
    /// silently ignored (update never inserts).
    pub async fn update_category(&self, category: Category) -> Result<()> {
        let mut state = self.state.write().await;
        if category.id().trim().is_empty() || !state.categories.contains_key(category.id()) {
            debug!(id = category.id(), "Ignoring update for unknown category");
            return Ok(());
        }

        state.categories.insert(category.id().to_string(), category);
        self.persist_categories(&state).await
    }

    /// Remove a category, clearing the reference on every item that
    /// points at it, then persist both collections. Unknown ids are a
    /// no-op.
    ///
    /// The write lock spans the cascade and both persists, so readers
    /// never observe an item referencing a deleted category.
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(category) = state.categories.remove(id) else {
            return Ok(());
        };

        let mut cleared = 0;
        for item in state.items.values_mut() {
            if item.category() == Some(&category) {
                item.set_category(None);
                cleared += 1;
            }
        }

        info!(category = category.name(), cleared, "Deleted category");
        self.persist_categories(&state).await?;
        self.persist_items(&state).await
    }

    pub async fn category(&self, id: &str) -> Option<Category> {
        self.state.read().await.categories.get(id).cloned()
    }

    /// Every category, ascending by id.
    pub async fn all_categories(&self) -> Vec<Category> {
        self.state
            .read()
            .await
            .categories
            .values()
            .cloned()
            .collect()
    }

    async fn persist_items(&self, state: &State) -> Result<()> {
        let items: Vec<Item> = state.items.values().cloned().collect();
        self.storage.save_items(&items).await
    }

    async fn persist_categories(&self, state: &State) -> Result<()> {
        let categories: Vec<Category> = state.categories.values().cloned().collect();
        self.storage.save_categories(&categories).await
    }
}
