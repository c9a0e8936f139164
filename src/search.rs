//! Search criteria evaluation.
//!
//! A [`SearchCriteria`] is a binary predicate over items: free text,
//! category, item type, and tags, combined with logical AND. There is
//! no relevance scoring.

use std::collections::BTreeSet;

use crate::model::{normalize_tag, Category, Item, ItemType};

/// Criteria for matching library items.
///
/// The query is trimmed and lowercased at construction; tags are
/// normalized the same way item tags are, so matching is
/// case-insensitive on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    query: String,
    category: Option<Category>,
    item_type: Option<ItemType>,
    tags: BTreeSet<String>,
}

impl SearchCriteria {
    /// Build full criteria. Unset selectors match everything.
    pub fn new<I, S>(
        query: &str,
        category: Option<Category>,
        item_type: Option<ItemType>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            query: query.trim().to_lowercase(),
            category,
            item_type,
            tags: tags
                .into_iter()
                .map(|t| normalize_tag(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Criteria for a plain text search (no category/type/tag filters).
    pub fn text(query: &str) -> Self {
        Self::new(query, None, None, std::iter::empty::<&str>())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Evaluate the criteria against an item.
    ///
    /// Pure: repeated calls with the same inputs agree and neither
    /// argument is mutated. All four clauses must hold:
    /// empty query or substring of the item's searchable text, unset or
    /// equal category (by id), unset or equal type, and empty tag set
    /// or any-overlap with the item's tags.
    pub fn matches(&self, item: &Item) -> bool {
        self.matches_query(item)
            && self.matches_category(item)
            && self.matches_type(item)
            && self.matches_tags(item)
    }

    fn matches_query(&self, item: &Item) -> bool {
        self.query.is_empty() || item.searchable_text().contains(&self.query)
    }

    fn matches_category(&self, item: &Item) -> bool {
        match &self.category {
            None => true,
            Some(category) => item.category() == Some(category),
        }
    }

    fn matches_type(&self, item: &Item) -> bool {
        match self.item_type {
            None => true,
            Some(item_type) => item.item_type() == item_type,
        }
    }

    fn matches_tags(&self, item: &Item) -> bool {
        self.tags.is_empty() || item.tags().iter().any(|t| self.tags.contains(t))
    }
}
