//! Content loader - turns post files under the content directory into entries

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

use super::{ContentEntry, ContentError, FrontMatter, MarkdownRenderer};
use crate::generator::RESERVED_OUTPUTS;
use crate::Blog;

/// Loads posts from the content directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &blog.config.highlight_theme,
            blog.config.line_numbers,
        );
        Self { blog, renderer }
    }

    /// Load every published post.
    ///
    /// Entries come back in walk order; ordering for display belongs to the
    /// feed. Unreadable files are skipped with a warning, while slug or id
    /// collisions, and slugs that would land on a generated file or outside
    /// the output directory, abort the load.
    pub fn load_entries(&self) -> Result<Vec<ContentEntry>> {
        let posts_dir = self.blog.posts_dir();
        if !posts_dir.exists() {
            tracing::debug!("No posts directory at {:?}", posts_dir);
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_entry(path) {
                Ok(Some(post)) => entries.push(post),
                Ok(None) => tracing::debug!("Skipping draft {:?}", path),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        check_unique(&entries)?;

        Ok(entries)
    }

    /// Load a single post; `None` for drafts that should not be rendered
    fn load_entry(&self, path: &Path) -> Result<Option<ContentEntry>, ContentError> {
        let raw = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if fm.draft && !self.blog.config.render_drafts {
            return Ok(None);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let title = fm.title.unwrap_or_else(|| stem.to_string());
        if title.trim().is_empty() {
            return Err(ContentError::EmptyTitle {
                path: path.to_path_buf(),
            });
        }

        let id = path
            .strip_prefix(&self.blog.source_dir)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let slug = match fm.slug {
            Some(custom) if !custom.trim().is_empty() => normalize_slug(&custom),
            _ => format!(
                "/{}/{}",
                self.blog.config.posts_dir.trim_matches('/'),
                slug::slugify(stem)
            ),
        };

        let content = self
            .renderer
            .render(body)
            .map_err(|e| ContentError::FrontMatter {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut post = ContentEntry::new(&id, &title, &slug, fm.date.as_deref().unwrap_or(""));
        post.description = fm.description;
        post.content = content;

        Ok(Some(post))
    }
}

/// Reject entries that would break key or link uniqueness in the feed
fn check_unique(entries: &[ContentEntry]) -> Result<(), ContentError> {
    let mut ids: HashSet<&str> = HashSet::new();
    let mut slugs: HashMap<&str, &str> = HashMap::new();

    for entry in entries {
        check_slug(entry)?;
        if !ids.insert(&entry.id) {
            return Err(ContentError::DuplicateId(entry.id.clone()));
        }
        if let Some(first) = slugs.insert(&entry.slug, &entry.id) {
            return Err(ContentError::DuplicateSlug {
                slug: entry.slug.clone(),
                first: first.to_string(),
                second: entry.id.clone(),
            });
        }
    }

    Ok(())
}

/// A slug must name a directory of its own below the output root
fn check_slug(entry: &ContentEntry) -> Result<(), ContentError> {
    let relative = entry.slug.trim_matches('/');

    let plain = !relative.is_empty()
        && Path::new(relative)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        && !relative.split('/').any(|segment| segment.is_empty() || segment == ".");
    if !plain {
        if relative.is_empty() {
            return Err(ContentError::ReservedSlug {
                slug: entry.slug.clone(),
                id: entry.id.clone(),
                reserved: "index.html".to_string(),
            });
        }
        return Err(ContentError::InvalidSlug {
            slug: entry.slug.clone(),
            id: entry.id.clone(),
        });
    }

    let page = entry.output_path();
    for reserved in RESERVED_OUTPUTS {
        let reserved_path = Path::new(reserved);
        if page.starts_with(reserved_path) || reserved_path.starts_with(&page) {
            return Err(ContentError::ReservedSlug {
                slug: entry.slug.clone(),
                id: entry.id.clone(),
                reserved: reserved.to_string(),
            });
        }
    }

    Ok(())
}

/// Custom slugs are site-absolute paths without a trailing slash
fn normalize_slug(slug: &str) -> String {
    format!("/{}", slug.trim().trim_matches('/'))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}
