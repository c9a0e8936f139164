//! Command-line interface for studyshelf.
//!
//! A thin presentation shim: every command maps onto a [`Library`]
//! call and prints plain text. It never touches the storage files
//! directly.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::model::{
    time, Category, Item, ItemKind, ItemType, MediaLink, MediaType, Note, PdfDocument, TextSnippet,
};
use crate::search::SearchCriteria;
use crate::service::Library;
use crate::storage::Storage;

/// studyshelf - personal study library
#[derive(Parser, Debug)]
#[command(name = "studyshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage directory (default: ~/.studyshelf)
    #[arg(long, global = true, env = "STUDYSHELF_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a note
    AddNote {
        title: String,

        /// Note body
        #[arg(short, long, default_value = "")]
        content: String,

        /// Treat the content as markdown
        #[arg(long)]
        markdown: bool,

        #[command(flatten)]
        common: CommonFields,
    },

    /// Add a PDF reference
    AddPdf {
        title: String,

        /// Path to the PDF file
        file_path: String,

        #[arg(long, default_value = "")]
        author: String,

        /// File size in bytes
        #[arg(long, default_value = "0")]
        file_size: u64,

        #[arg(long, default_value = "0")]
        pages: u32,

        #[command(flatten)]
        common: CommonFields,
    },

    /// Add a media link
    AddMedia {
        title: String,

        /// Media URL
        url: String,

        /// video, audio, podcast, lecture, or other
        #[arg(long, default_value = "video")]
        media_type: MediaType,

        /// Where the media lives (e.g. YouTube)
        #[arg(long, default_value = "")]
        source: String,

        /// Duration in minutes
        #[arg(long, default_value = "0")]
        duration: u32,

        #[command(flatten)]
        common: CommonFields,
    },

    /// Add a text snippet
    AddSnippet {
        title: String,

        /// Snippet body
        content: String,

        /// Programming language or format
        #[arg(long, default_value = "text")]
        language: String,

        /// Optional source reference
        #[arg(long)]
        source_url: Option<String>,

        #[command(flatten)]
        common: CommonFields,
    },

    /// List items, optionally filtered by type or tag
    List {
        /// note, pdf, media, or snippet
        #[arg(short = 'T', long)]
        item_type: Option<ItemType>,

        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Free-text search across all items
    Search {
        query: String,
    },

    /// Delete an item by id
    Delete {
        id: String,
    },

    /// List every tag in use
    Tags,

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Show item counts by type
    Stats,
}

/// Fields shared by every add command.
#[derive(clap::Args, Debug)]
pub struct CommonFields {
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Category name (must already exist)
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        name: String,

        /// Hex color (e.g. #3498db)
        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// List all categories
    List,

    /// Delete a category by id (items keep their data, lose the reference)
    Delete {
        id: String,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let dir = match self.dir {
            Some(dir) => dir,
            None => Storage::default_dir()?,
        };
        let library = Library::open(Storage::new(dir)).await?;

        match self.command {
            Commands::AddNote {
                title,
                content,
                markdown,
                common,
            } => {
                let kind = ItemKind::Note(Note {
                    content,
                    is_markdown: markdown,
                });
                add_item(&library, title, kind, common).await
            }

            Commands::AddPdf {
                title,
                file_path,
                author,
                file_size,
                pages,
                common,
            } => {
                let kind = ItemKind::Pdf(PdfDocument {
                    file_path,
                    file_size,
                    page_count: pages,
                    author,
                });
                add_item(&library, title, kind, common).await
            }

            Commands::AddMedia {
                title,
                url,
                media_type,
                source,
                duration,
                common,
            } => {
                let kind = ItemKind::Media(MediaLink {
                    url,
                    media_type,
                    duration_minutes: duration,
                    source,
                });
                add_item(&library, title, kind, common).await
            }

            Commands::AddSnippet {
                title,
                content,
                language,
                source_url,
                common,
            } => {
                let kind = ItemKind::Snippet(TextSnippet {
                    content,
                    language,
                    source_url,
                });
                add_item(&library, title, kind, common).await
            }

            Commands::List { item_type, tag } => {
                let criteria =
                    SearchCriteria::new("", None, item_type, tag.iter().map(String::as_str));
                let items = library.search(&criteria).await;
                print_items(&items);
                Ok(())
            }

            Commands::Search { query } => {
                let items = library.search_items(&query).await;
                if items.is_empty() {
                    println!("No matches for '{}'", query);
                } else {
                    print_items(&items);
                }
                Ok(())
            }

            Commands::Delete { id } => {
                library.delete_item(&id).await?;
                println!("Deleted {} (if it existed)", id);
                Ok(())
            }

            Commands::Tags => {
                for tag in library.all_tags().await {
                    println!("{}", tag);
                }
                Ok(())
            }

            Commands::Category { command } => match command {
                CategoryCommands::Add {
                    name,
                    color,
                    description,
                } => {
                    let mut category = Category::new(name);
                    if let Some(color) = color {
                        category = category.with_color(color);
                    }
                    if let Some(description) = description {
                        category = category.with_description(description);
                    }
                    println!("{}  {}", category.id(), category.name());
                    library.add_category(category).await
                }

                CategoryCommands::List => {
                    for category in library.all_categories().await {
                        println!(
                            "{}  {}  {}  {}",
                            category.id(),
                            category.color(),
                            category.name(),
                            category.description().unwrap_or("-"),
                        );
                    }
                    Ok(())
                }

                CategoryCommands::Delete { id } => {
                    library.delete_category(&id).await?;
                    println!("Deleted category {} (if it existed)", id);
                    Ok(())
                }
            },

            Commands::Stats => {
                println!("Total items: {}", library.item_count().await);
                for item_type in [
                    ItemType::Note,
                    ItemType::Pdf,
                    ItemType::MediaLink,
                    ItemType::TextSnippet,
                ] {
                    let count = library.item_count_by_type(item_type).await;
                    println!("  {}: {}", item_type.display_name(), count);
                }
                println!("Categories: {}", library.all_categories().await.len());
                println!("Tags: {}", library.all_tags().await.len());
                Ok(())
            }
        }
    }
}

async fn add_item(
    library: &Library,
    title: String,
    kind: ItemKind,
    common: CommonFields,
) -> Result<()> {
    let mut item = Item::new(title, kind).with_description(common.description);

    if let Some(tags) = common.tags {
        for tag in tags.split(',') {
            item = item.with_tag(tag);
        }
    }

    if let Some(name) = common.category {
        match find_category(library, &name).await {
            Some(category) => item = item.with_category(category),
            None => println!("Warning: no category named '{}', leaving item uncategorized", name),
        }
    }

    println!("{}  {}", item.id(), item.title());
    library.add_item(item).await
}

async fn find_category(library: &Library, name: &str) -> Option<Category> {
    library
        .all_categories()
        .await
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
}

fn print_items(items: &[Item]) {
    for item in items {
        let category = item
            .category()
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {}  [{}]  {}  {}  ({})",
            item.type_icon(),
            item.title(),
            category,
            item.id(),
            item.summary(),
            time::relative_time(item.last_modified()),
        );
    }
}
