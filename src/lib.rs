//! studyshelf - personal study library
//!
//! A small library of heterogeneous content items (notes, PDF
//! references, media links, text snippets) organized by category and
//! free-form tags, persisted as JSON documents and searchable by free
//! text, category, type, and tag.
//!
//! # Architecture
//!
//! - `model`: passive data (items, categories, timestamps)
//! - `search`: criteria predicate over items
//! - `storage`: whole-document JSON persistence with item envelopes
//! - `service`: the [`Library`], sole entry point; in-memory indexes
//!   with write-through persistence and referential integrity
//! - `cli`: command-line presentation shim
//!
//! # Usage
//!
//! ```bash
//! studyshelf add-note "Ownership rules" --content "Moves, borrows, lifetimes" --tags rust
//! studyshelf search rust
//! studyshelf stats
//! ```

pub mod cli;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;

// Re-export the main types at crate root for convenience
pub use model::{
    Category, Item, ItemKind, ItemType, MediaLink, MediaType, Note, PdfDocument, TextSnippet,
};
pub use search::SearchCriteria;
pub use service::Library;
pub use storage::Storage;
