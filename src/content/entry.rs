//! Published post model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One published post, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Stable identity, the source path relative to the content root
    pub id: String,

    /// Display title, never empty
    pub title: String,

    /// Link path to the full post, unique across entries
    pub slug: String,

    /// Date exactly as written in the front-matter; parsed when ordering
    pub date: String,

    /// Optional summary shown under the heading in the feed
    pub description: Option<String>,

    /// Rendered HTML body
    pub content: String,
}

impl ContentEntry {
    /// Create an entry with an empty body
    pub fn new(id: &str, title: &str, slug: &str, date: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            date: date.to_string(),
            description: None,
            content: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Output path of this entry's page, relative to the public directory
    pub fn output_path(&self) -> PathBuf {
        let trimmed = self.slug.trim_matches('/');
        if trimmed.is_empty() {
            PathBuf::from("index.html")
        } else {
            PathBuf::from(trimmed).join("index.html")
        }
    }
}
