//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Writing
    pub render_drafts: bool,
    pub highlight_theme: String,
    pub line_numbers: bool,

    // Feed
    pub feed_limit: usize,

    // Presentation
    pub font_family: String,
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub shell: ShellStyle,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Balanced Solutions Software - Seamless Development and Hosting Solutions \
                    for Web, Mobile, and Desktop Applications"
                .to_string(),
            description: "We shall handle the nerd stuff. Elevate your digital presence with \
                          our expert development and hosting services. From web to mobile to \
                          desktop, we deliver tailored solutions for optimal performance."
                .to_string(),
            author: "Balanced Solutions Software".to_string(),
            language: "en".to_string(),

            url: "https://blog.balasolu.com".to_string(),
            root: "/".to_string(),

            source_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            render_drafts: false,
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,

            feed_limit: 20,

            font_family: "Akshar".to_string(),
            nav: vec![
                NavLink::new("Home", "https://balasolu.com"),
                NavLink::new("Blog", "/"),
            ],
            background: BackgroundConfig::default(),
            shell: ShellStyle::default(),
            analytics: AnalyticsConfig::default(),

        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        // An empty file is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Override the analytics measurement id with one resolved by the caller.
    ///
    /// Blank ids are ignored so an empty environment variable does not
    /// disable an id configured in `_config.yml`.
    pub fn with_analytics_id(mut self, id: Option<String>) -> Self {
        if let Some(id) = id.filter(|id| !id.trim().is_empty()) {
            tracing::debug!("Using injected analytics id");
            self.analytics.measurement_id = Some(id.trim().to_string());
        }
        self
    }
}

/// A header navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

impl NavLink {
    pub fn new(name: &str, href: &str) -> Self {
        Self {
            name: name.to_string(),
            href: href.to_string(),
        }
    }

    /// Links leaving the site are rendered as plain anchors with `rel="noopener"`
    pub fn is_external(&self) -> bool {
        self.href.starts_with("http://") || self.href.starts_with("https://")
    }
}

/// Full-page background image behind the main wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub src: String,
    pub alt: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            src: "https://balasolu.com/jwt.webp".to_string(),
            alt: "jwt".to_string(),
        }
    }
}

/// Style knobs for the page shell (main wrapper, overlay, backdrop panel).
///
/// Each layout revision of the site only differed in these values, so a
/// single shell template takes them as configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellStyle {
    /// Padding inside the backdrop panel, in CSS units
    pub backdrop_padding: String,
    /// Backdrop panel opacity, 0.0 to 1.0
    pub backdrop_opacity: f64,
    /// Gap between children of the main wrapper
    pub wrapper_gap: String,
    /// Whether the darkening overlay is drawn above the background image
    pub overlay: bool,
    /// Maximum width of the content column
    pub max_width: String,
}

impl Default for ShellStyle {
    fn default() -> Self {
        Self {
            backdrop_padding: "2rem".to_string(),
            backdrop_opacity: 0.9,
            wrapper_gap: "0.75rem".to_string(),
            overlay: true,
            max_width: "100%".to_string(),
        }
    }
}

/// Google Analytics settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub measurement_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.title.starts_with("Balanced Solutions Software"));
        assert_eq!(config.language, "en");
        assert_eq!(config.feed_limit, 20);
        assert_eq!(config.nav.len(), 2);
        assert!(config.analytics.measurement_id.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
feed_limit: 5
nav:
  - name: Docs
    href: /docs/
shell:
  backdrop_padding: 1rem
  overlay: false
analytics:
  measurement_id: G-TEST
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.feed_limit, 5);
        assert_eq!(config.nav, vec![NavLink::new("Docs", "/docs/")]);
        assert_eq!(config.shell.backdrop_padding, "1rem");
        assert!(!config.shell.overlay);
        // Unset shell fields keep their defaults
        assert_eq!(config.shell.wrapper_gap, "0.75rem");
        assert_eq!(config.analytics.measurement_id.as_deref(), Some("G-TEST"));
        // Unset top-level fields keep their defaults
        assert_eq!(config.posts_dir, "posts");
    }

    #[test]
    fn test_with_analytics_id() {
        let config = SiteConfig::default().with_analytics_id(Some("G-ABC".to_string()));
        assert_eq!(config.analytics.measurement_id.as_deref(), Some("G-ABC"));

        let mut config = SiteConfig::default();
        config.analytics.measurement_id = Some("G-FILE".to_string());
        let config = config.with_analytics_id(Some("  ".to_string()));
        assert_eq!(config.analytics.measurement_id.as_deref(), Some("G-FILE"));

        let config = SiteConfig::default().with_analytics_id(None);
        assert!(config.analytics.measurement_id.is_none());
    }

    #[test]
    fn test_external_nav_link() {
        assert!(NavLink::new("Home", "https://balasolu.com").is_external());
        assert!(!NavLink::new("Blog", "/").is_external());
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.public_dir, "public");
    }
}
