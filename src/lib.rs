//! balasolu-blog: static generator for the Balanced Solutions Software blog
//!
//! Posts are markdown files with front-matter. They are loaded into
//! [`content::ContentEntry`] values, ordered newest first by
//! [`feed::render_feed`], and written out as HTML with embedded Tera
//! templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Analytics id injected by the caller, reapplied on reload
    analytics_id: Option<String>,
}

impl Blog {
    /// Open a site, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site and inject an analytics id resolved by the caller.
    ///
    /// The id survives [`Blog::reload`], so config edits picked up by the
    /// watcher keep it.
    pub fn open<P: AsRef<Path>>(base_dir: P, analytics_id: Option<String>) -> Result<Self> {
        let blog = Self::new(base_dir)?;
        let config = blog.config.with_analytics_id(analytics_id.clone());
        let mut blog = Self::with_config(&blog.base_dir, config);
        blog.analytics_id = analytics_id;
        Ok(blog)
    }

    /// Re-read `_config.yml` from disk
    pub fn reload(&self) -> Result<Self> {
        Self::open(&self.base_dir, self.analytics_id.clone())
    }

    /// Open a site with an already-built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            analytics_id: None,
        }
    }

    /// Directory holding post files
    pub fn posts_dir(&self) -> PathBuf {
        self.source_dir.join(&self.config.posts_dir)
    }

    /// Directory copied verbatim into the output
    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.static_dir)
    }

    /// Path of the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.source_dir, dir.path().join("content"));
        assert_eq!(blog.posts_dir(), dir.path().join("content/posts"));
        assert_eq!(blog.public_dir, dir.path().join("public"));
        assert_eq!(blog.static_dir(), dir.path().join("static"));
    }

    #[test]
    fn test_config_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "source_dir: src\npublic_dir: out\nposts_dir: blog\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.posts_dir(), dir.path().join("src/blog"));
        assert_eq!(blog.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_injected_analytics_survives_reload() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::open(dir.path(), Some("G-INJECTED".to_string())).unwrap();
        assert_eq!(
            blog.config.analytics.measurement_id.as_deref(),
            Some("G-INJECTED")
        );

        fs::write(dir.path().join("_config.yml"), "title: Changed\n").unwrap();
        let reloaded = blog.reload().unwrap();
        assert_eq!(reloaded.config.title, "Changed");
        assert_eq!(
            reloaded.config.analytics.measurement_id.as_deref(),
            Some("G-INJECTED")
        );
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "feed_limit: [1, 2\n").unwrap();
        assert!(Blog::new(dir.path()).is_err());
    }
}
