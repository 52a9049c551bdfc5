//! Content module - loads posts and renders their markdown

mod entry;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;

pub use entry::ContentEntry;
pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
