//! Library items: the closed set of content variants and their shared
//! metadata.
//!
//! An [`Item`] carries the common fields (title, description, category,
//! tags, timestamps) and exactly one variant payload in [`ItemKind`].
//! Mutation goes through the setters on `Item`, which implement the
//! touch policy: content-bearing edits refresh `last_modified`,
//! metadata-only edits (file size, page count, duration) do not.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::time;

/// Normalize a tag: trim and lowercase. An empty result means the tag
/// is blank and must be rejected.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Discriminant for the item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "NOTE")]
    Note,

    #[serde(rename = "PDF")]
    Pdf,

    #[serde(rename = "MEDIA_LINK")]
    MediaLink,

    #[serde(rename = "TEXT_SNIPPET")]
    TextSnippet,
}

impl ItemType {
    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemType::Note => "Note",
            ItemType::Pdf => "PDF Document",
            ItemType::MediaLink => "Media Link",
            ItemType::TextSnippet => "Text Snippet",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ItemType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "note" => Ok(ItemType::Note),
            "pdf" => Ok(ItemType::Pdf),
            "media" | "media-link" | "link" => Ok(ItemType::MediaLink),
            "snippet" | "text-snippet" => Ok(ItemType::TextSnippet),
            _ => anyhow::bail!("Unknown item type: {}", s),
        }
    }
}

/// Kind of media a [`MediaLink`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Video,
    Audio,
    Podcast,
    Lecture,
    Other,
}

impl MediaType {
    pub fn display_name(&self) -> &'static str {
        match self {
            MediaType::Video => "Video",
            MediaType::Audio => "Audio",
            MediaType::Podcast => "Podcast",
            MediaType::Lecture => "Lecture",
            MediaType::Other => "Other",
        }
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self::Video
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "podcast" => Ok(MediaType::Podcast),
            "lecture" => Ok(MediaType::Lecture),
            "other" => Ok(MediaType::Other),
            _ => anyhow::bail!("Unknown media type: {}", s),
        }
    }
}

/// A free-form note, optionally markdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub is_markdown: bool,
}

impl Note {
    /// Whitespace-collapsed preview of the first 100 characters.
    pub fn content_preview(&self) -> String {
        preview(&self.content, "Empty note")
    }
}

/// A reference to a PDF file on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDocument {
    #[serde(default)]
    pub file_path: String,

    /// File size in bytes (metadata only, does not touch)
    #[serde(default)]
    pub file_size: u64,

    /// Page count (metadata only, does not touch)
    #[serde(default)]
    pub page_count: u32,

    #[serde(default)]
    pub author: String,
}

impl PdfDocument {
    /// Base name of the file path, or "Unknown" when the path is empty.
    pub fn file_name(&self) -> String {
        if self.file_path.is_empty() {
            return "Unknown".to_string();
        }
        Path::new(&self.file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.clone())
    }

    /// Human-readable file size (B / KB / MB).
    pub fn file_size_formatted(&self) -> String {
        if self.file_size < 1024 {
            format!("{} B", self.file_size)
        } else if self.file_size < 1024 * 1024 {
            format!("{:.2} KB", self.file_size as f64 / 1024.0)
        } else {
            format!("{:.2} MB", self.file_size as f64 / (1024.0 * 1024.0))
        }
    }
}

/// A link to online media content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaLink {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub media_type: MediaType,

    /// Duration in minutes (metadata only, does not touch)
    #[serde(default)]
    pub duration_minutes: u32,

    /// Where the media lives (e.g. YouTube, Coursera)
    #[serde(default)]
    pub source: String,
}

impl MediaLink {
    /// Formatted duration ("Unknown", "45 min", "1h 20m").
    pub fn duration_formatted(&self) -> String {
        if self.duration_minutes == 0 {
            "Unknown".to_string()
        } else if self.duration_minutes < 60 {
            format!("{} min", self.duration_minutes)
        } else {
            format!("{}h {}m", self.duration_minutes / 60, self.duration_minutes % 60)
        }
    }

    /// Check the URL has an http/https scheme.
    pub fn is_valid_url(&self) -> bool {
        let lower = self.url.to_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

fn default_language() -> String {
    "text".to_string()
}

/// A quick text snippet, usually code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSnippet {
    #[serde(default)]
    pub content: String,

    /// Programming language or format (e.g. "rust", "sql", "json")
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Default for TextSnippet {
    fn default() -> Self {
        Self {
            content: String::new(),
            language: default_language(),
            source_url: None,
        }
    }
}

impl TextSnippet {
    /// Whitespace-collapsed preview of the first 100 characters.
    pub fn content_preview(&self) -> String {
        preview(&self.content, "Empty snippet")
    }

    /// Number of lines in the content.
    pub fn line_count(&self) -> usize {
        if self.content.is_empty() {
            0
        } else {
            self.content.split('\n').count()
        }
    }
}

fn preview(content: &str, empty_label: &str) -> String {
    if content.is_empty() {
        return empty_label.to_string();
    }
    let stripped = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if stripped.chars().count() > 100 {
        let head: String = stripped.chars().take(97).collect();
        format!("{}...", head)
    } else {
        stripped
    }
}

/// The closed set of variant payloads.
///
/// Internally tagged so the discriminant travels inside the serialized
/// payload; the storage layer adds an outer envelope tag on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "itemType")]
pub enum ItemKind {
    #[serde(rename = "NOTE")]
    Note(Note),

    #[serde(rename = "PDF")]
    Pdf(PdfDocument),

    #[serde(rename = "MEDIA_LINK")]
    Media(MediaLink),

    #[serde(rename = "TEXT_SNIPPET")]
    Snippet(TextSnippet),
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Note(_) => ItemType::Note,
            ItemKind::Pdf(_) => ItemType::Pdf,
            ItemKind::Media(_) => ItemType::MediaLink,
            ItemKind::Snippet(_) => ItemType::TextSnippet,
        }
    }
}

/// A unit of library content.
///
/// Common fields are private; reads go through accessors and writes
/// through the touch-policy setters below, so callers cannot bypass tag
/// normalization or the `last_modified` bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: String,

    #[serde(default)]
    title: String,

    #[serde(default)]
    description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<Category>,

    #[serde(default)]
    tags: BTreeSet<String>,

    #[serde(with = "time::timestamp")]
    date_added: NaiveDateTime,

    #[serde(with = "time::timestamp")]
    last_modified: NaiveDateTime,

    #[serde(flatten)]
    kind: ItemKind,
}

impl Item {
    /// Create an item with a fresh id and both timestamps set to now.
    pub fn new(title: impl Into<String>, kind: ItemKind) -> Self {
        let now = time::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            category: None,
            tags: BTreeSet::new(),
            date_added: now,
            last_modified: now,
            kind,
        }
    }

    /// Set the description at construction time (no touch).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category at construction time (no touch).
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Add a normalized tag at construction time (no touch).
    pub fn with_tag(mut self, tag: &str) -> Self {
        let normalized = normalize_tag(tag);
        if !normalized.is_empty() {
            self.tags.insert(normalized);
        }
        self
    }

    // Accessors

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Tags, normalized and sorted.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn date_added(&self) -> NaiveDateTime {
        self.date_added
    }

    pub fn last_modified(&self) -> NaiveDateTime {
        self.last_modified
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    pub fn as_note(&self) -> Option<&Note> {
        match &self.kind {
            ItemKind::Note(note) => Some(note),
            _ => None,
        }
    }

    pub fn as_pdf(&self) -> Option<&PdfDocument> {
        match &self.kind {
            ItemKind::Pdf(pdf) => Some(pdf),
            _ => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaLink> {
        match &self.kind {
            ItemKind::Media(media) => Some(media),
            _ => None,
        }
    }

    pub fn as_snippet(&self) -> Option<&TextSnippet> {
        match &self.kind {
            ItemKind::Snippet(snippet) => Some(snippet),
            _ => None,
        }
    }

    /// Refresh `last_modified`.
    pub fn touch(&mut self) {
        self.last_modified = time::now();
    }

    // Common-field setters (all content-bearing)

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.touch();
    }

    /// Replace the tag set. Each tag is normalized; blank tags are dropped.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| normalize_tag(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        self.touch();
    }

    /// Add a tag. Blank tags are rejected without touching; repeated
    /// adds of the same tag (case-insensitively) are idempotent.
    pub fn add_tag(&mut self, tag: &str) {
        let normalized = normalize_tag(tag);
        if !normalized.is_empty() {
            self.tags.insert(normalized);
            self.touch();
        }
    }

    /// Remove a tag. Touches whether or not the tag was present.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.remove(&normalize_tag(tag));
        self.touch();
    }

    /// Membership test against the normalized form of `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&normalize_tag(tag))
    }

    // Variant-field setters. Each silently no-ops when the item is not
    // of the matching variant. Content-bearing fields touch; the
    // metadata-only fields (file size, page count, duration) do not.

    pub fn set_note_content(&mut self, content: impl Into<String>) {
        if let ItemKind::Note(note) = &mut self.kind {
            note.content = content.into();
            self.touch();
        }
    }

    pub fn set_note_markdown(&mut self, is_markdown: bool) {
        if let ItemKind::Note(note) = &mut self.kind {
            note.is_markdown = is_markdown;
            self.touch();
        }
    }

    pub fn set_pdf_file_path(&mut self, file_path: impl Into<String>) {
        if let ItemKind::Pdf(pdf) = &mut self.kind {
            pdf.file_path = file_path.into();
            self.touch();
        }
    }

    pub fn set_pdf_author(&mut self, author: impl Into<String>) {
        if let ItemKind::Pdf(pdf) = &mut self.kind {
            pdf.author = author.into();
            self.touch();
        }
    }

    pub fn set_pdf_file_size(&mut self, file_size: u64) {
        if let ItemKind::Pdf(pdf) = &mut self.kind {
            pdf.file_size = file_size;
        }
    }

    pub fn set_pdf_page_count(&mut self, page_count: u32) {
        if let ItemKind::Pdf(pdf) = &mut self.kind {
            pdf.page_count = page_count;
        }
    }

    pub fn set_media_url(&mut self, url: impl Into<String>) {
        if let ItemKind::Media(media) = &mut self.kind {
            media.url = url.into();
            self.touch();
        }
    }

    pub fn set_media_type(&mut self, media_type: MediaType) {
        if let ItemKind::Media(media) = &mut self.kind {
            media.media_type = media_type;
            self.touch();
        }
    }

    pub fn set_media_source(&mut self, source: impl Into<String>) {
        if let ItemKind::Media(media) = &mut self.kind {
            media.source = source.into();
            self.touch();
        }
    }

    pub fn set_media_duration_minutes(&mut self, duration_minutes: u32) {
        if let ItemKind::Media(media) = &mut self.kind {
            media.duration_minutes = duration_minutes;
        }
    }

    pub fn set_snippet_content(&mut self, content: impl Into<String>) {
        if let ItemKind::Snippet(snippet) = &mut self.kind {
            snippet.content = content.into();
            self.touch();
        }
    }

    pub fn set_snippet_language(&mut self, language: impl Into<String>) {
        if let ItemKind::Snippet(snippet) = &mut self.kind {
            snippet.language = language.into();
            self.touch();
        }
    }

    pub fn set_snippet_source_url(&mut self, source_url: Option<String>) {
        if let ItemKind::Snippet(snippet) = &mut self.kind {
            snippet.source_url = source_url;
            self.touch();
        }
    }

    /// Derived lowercase text used for free-text substring matching.
    ///
    /// Pure: never mutates state, safe to call repeatedly. Concatenates
    /// title, description, tags, category name, then the variant's own
    /// searchable fields.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.title, &self.description];
        parts.extend(self.tags.iter().map(String::as_str));
        if let Some(category) = &self.category {
            parts.push(category.name());
        }

        let file_name;
        match &self.kind {
            ItemKind::Note(note) => parts.push(&note.content),
            ItemKind::Pdf(pdf) => {
                parts.push(&pdf.author);
                file_name = pdf.file_name();
                parts.push(&file_name);
            }
            ItemKind::Media(media) => {
                parts.push(&media.url);
                parts.push(&media.source);
                parts.push(media.media_type.display_name());
            }
            ItemKind::Snippet(snippet) => {
                parts.push(&snippet.content);
                parts.push(&snippet.language);
            }
        }

        parts.join(" ").to_lowercase()
    }

    /// Short per-variant icon for list output.
    pub fn type_icon(&self) -> &'static str {
        match &self.kind {
            ItemKind::Note(note) => {
                if note.is_markdown {
                    "📝✨"
                } else {
                    "📝"
                }
            }
            ItemKind::Pdf(pdf) => {
                if pdf.page_count > 100 {
                    "📚"
                } else {
                    "📄"
                }
            }
            ItemKind::Media(media) => {
                if media.duration_minutes > 60 {
                    "🎬"
                } else {
                    "🎵"
                }
            }
            ItemKind::Snippet(_) => "💻",
        }
    }

    /// One-line per-variant summary with payload metadata.
    pub fn summary(&self) -> String {
        match &self.kind {
            ItemKind::Note(note) => {
                if note.content.chars().count() > 1000 {
                    format!("Long note ({})", note.content_preview())
                } else {
                    format!("Note: {}", note.content_preview())
                }
            }
            ItemKind::Pdf(pdf) => {
                if pdf.page_count > 0 {
                    format!("PDF: {} ({} pages)", pdf.file_name(), pdf.page_count)
                } else {
                    format!("PDF: {}", pdf.file_name())
                }
            }
            ItemKind::Media(media) => {
                if media.duration_minutes > 0 {
                    format!(
                        "Media: {} ({})",
                        media.media_type.display_name(),
                        media.duration_formatted()
                    )
                } else {
                    format!("Media: {}", media.media_type.display_name())
                }
            }
            ItemKind::Snippet(snippet) => {
                if snippet.language != "text" {
                    format!("Snippet ({}): {}", snippet.language, snippet.content_preview())
                } else {
                    format!("Snippet: {}", snippet.content_preview())
                }
            }
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.title.is_empty() {
            write!(f, "Untitled {}", self.item_type().display_name())
        } else {
            write!(f, "{}", self.title)
        }
    }
}
