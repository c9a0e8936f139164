//! Categories for grouping library items.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default hex color for new categories.
pub const DEFAULT_COLOR: &str = "#3498db";

/// A named, colored grouping for library items.
///
/// Identity lives in `id` alone: two categories are equal iff their ids
/// match, regardless of name, color, or description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    id: String,
    name: String,
    color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Category {
    /// Create a category with a fresh id and the default color.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: DEFAULT_COLOR.to_string(),
            description: None,
        }
    }

    /// Set the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl std::hash::Hash for Category {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "Unnamed Category")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_gets_default_color() {
        let category = Category::new("Programming");
        assert_eq!(category.name(), "Programming");
        assert_eq!(category.color(), DEFAULT_COLOR);
        assert!(category.description().is_none());
        assert!(!category.id().is_empty());
    }

    #[test]
    fn test_equality_is_id_only() {
        let a = Category::new("Programming");
        let mut b = a.clone();
        b.set_name("Renamed");
        b.set_color("#ff0000");
        assert_eq!(a, b);

        let c = Category::new("Programming");
        assert_ne!(a, c);
    }

    #[test]
    fn test_serialization_round_trip() {
        let category = Category::new("Math")
            .with_color("#00ff00")
            .with_description("Algebra and calculus");

        let json = serde_json::to_string(&category).unwrap();
        let parsed: Category = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, category);
        assert_eq!(parsed.name(), "Math");
        assert_eq!(parsed.color(), "#00ff00");
        assert_eq!(parsed.description(), Some("Algebra and calculus"));
    }
}
