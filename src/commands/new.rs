//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Options for a new post beyond its title
#[derive(Debug, Clone, Default)]
pub struct NewPost<'a> {
    /// File name stem; defaults to the slugified title
    pub slug: Option<&'a str>,
    pub description: Option<&'a str>,
    pub draft: bool,
}

/// Create a post file with front-matter and return its path
pub fn create_post(blog: &Blog, title: &str, options: &NewPost) -> Result<PathBuf> {
    if title.trim().is_empty() {
        anyhow::bail!("A post needs a title");
    }

    let now = chrono::Local::now();
    let posts_dir = blog.posts_dir();
    fs::create_dir_all(&posts_dir)?;

    let stem = slug::slugify(options.slug.unwrap_or(title));
    let file_path = posts_dir.join(format!("{}.md", stem));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut front_matter = String::from("---\n");
    front_matter.push_str(&format!("title: {}\n", yaml_string(title)));
    front_matter.push_str(&format!("date: {}\n", now.format("%Y-%m-%d %H:%M:%S")));
    if let Some(description) = options.description {
        front_matter.push_str(&format!("description: {}\n", yaml_string(description)));
    }
    if options.draft {
        front_matter.push_str("draft: true\n");
    }
    front_matter.push_str("---\n\n");

    fs::write(&file_path, front_matter)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a value so YAML reads it back as the same string
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
