//! Data model for the study library.
//!
//! Items are a closed set of four variants (note, PDF reference, media
//! link, text snippet) sharing common metadata; categories group items
//! and are referenced by embedding. Everything here is passive data;
//! persistence lives in `storage` and orchestration in `service`.

pub mod category;
pub mod item;
pub mod time;

pub use category::{Category, DEFAULT_COLOR};
pub use item::{
    normalize_tag, Item, ItemKind, ItemType, MediaLink, MediaType, Note, PdfDocument, TextSnippet,
};
