//! Built-in site templates using the Tera template engine
//!
//! Every page is rendered in two steps: a content fragment (`index.html`,
//! `post.html`) and then the shared page shell (`layout.html`) wrapped
//! around it with [`TemplateRenderer::render_shell`].

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{ShellStyle, SiteConfig};
use crate::feed::DisplayItem;
use crate::helpers::{encode_path, html_escape, is_absolute_url, url_for};

/// Stylesheet written to `css/style.css` in the output
pub const STYLESHEET: &str = include_str!("site/style.css");

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit through `escape_html` so URLs keep their slashes
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
        ])?;

        tera.register_filter("escape_html", escape_html_filter);

        let url_config = config.clone();
        tera.register_function(
            "url_for",
            move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
                let path = match args.get("path") {
                    Some(val) => tera::try_get_value!("url_for", "path", String, val),
                    None => return Err("url_for requires a `path` argument".into()),
                };
                let url = if is_absolute_url(&path) {
                    path
                } else {
                    encode_path(&url_for(&url_config, &path))
                };
                Ok(tera::Value::String(url))
            },
        );

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the feed fragment for the index page
    pub fn render_feed(&self, feed: &[DisplayItem]) -> Result<String> {
        let mut context = Context::new();
        context.insert("feed", feed);
        self.render("index.html", &context)
    }

    /// Render the fragment for a single post
    pub fn render_post(&self, post: &PostData) -> Result<String> {
        let mut context = Context::new();
        context.insert("post", post);
        self.render("post.html", &context)
    }

    /// Wrap already-rendered children in the page shell.
    ///
    /// This is the one place the wrapper, overlay, backdrop and header are
    /// produced; `style` carries everything that varies between layouts.
    pub fn render_shell(
        &self,
        children: &str,
        page: &PageMeta,
        config: &ConfigData,
        style: &ShellStyle,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("children", children);
        context.insert("page", page);
        context.insert("config", config);
        context.insert("style", style);
        self.render("layout.html", &context)
    }
}

/// Tera filter: escape HTML special characters
fn escape_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::String(s) => s.clone(),
        tera::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

// Data structures for template context

/// Per-page head metadata
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: Option<String>,
}

/// Site-wide values the shell needs
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub site_title: String,
    pub language: String,
    pub generator: String,
    pub font_family: String,
    pub font_url: String,
    pub stylesheet: String,
    pub atom: String,
    pub background_src: String,
    pub background_alt: String,
    pub nav: Vec<NavItem>,
    pub analytics_id: Option<String>,
}

impl ConfigData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            site_title: config.title.clone(),
            language: config.language.clone(),
            generator: format!("balasolu-blog {}", env!("CARGO_PKG_VERSION")),
            font_family: config.font_family.clone(),
            font_url: format!(
                "https://fonts.googleapis.com/css2?family={}&display=swap",
                config.font_family.trim().replace(' ', "+")
            ),
            stylesheet: url_for(config, "/css/style.css"),
            atom: url_for(config, "/atom.xml"),
            background_src: url_for(config, &config.background.src),
            background_alt: config.background.alt.clone(),
            nav: config
                .nav
                .iter()
                .map(|link| NavItem {
                    name: link.name.clone(),
                    href: url_for(config, &link.href),
                    external: link.is_external(),
                })
                .collect(),
            analytics_id: config.analytics.measurement_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub name: String,
    pub href: String,
    pub external: bool,
}

/// A single post as shown on its own page
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub description: Option<String>,
    /// Human-readable date, absent when the entry's date does not parse
    pub display_date: Option<String>,
    /// Machine-readable date for the `<time>` element
    pub datetime: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavLink;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&SiteConfig::default()).unwrap()
    }

    fn item(key: &str, body: Option<&str>) -> DisplayItem {
        DisplayItem {
            key: key.to_string(),
            link_target: format!("/posts/{}", key),
            heading: format!("Heading {}", key),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_render_feed_fragment() {
        let html = renderer()
            .render_feed(&[item("a", Some("About <a>")), item("b", None)])
            .unwrap();

        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.contains(r#"data-key="a""#));
        assert!(html.contains(r#"<a href="/posts/a">"#));
        assert!(html.contains("<h2>Heading a</h2>"));
        assert!(html.contains("<p>About &lt;a&gt;</p>"));
        // Only the first item has a body
        assert_eq!(html.matches("<p>").count(), 1);
        // Order follows the feed
        assert!(html.find("Heading a").unwrap() < html.find("Heading b").unwrap());
    }

    #[test]
    fn test_render_empty_feed() {
        let html = renderer().render_feed(&[]).unwrap();
        assert!(!html.contains("<article"));
    }

    #[test]
    fn test_link_respects_root() {
        let mut config = SiteConfig::default();
        config.root = "/blog/".to_string();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let html = renderer.render_feed(&[item("a", None)]).unwrap();
        assert!(html.contains(r#"href="/blog/posts/a""#));
    }

    #[test]
    fn test_render_shell() {
        let mut config = SiteConfig::default();
        config.nav = vec![
            NavLink::new("Home", "https://balasolu.com"),
            NavLink::new("Blog", "/"),
        ];
        let page = PageMeta {
            title: "Title & more".to_string(),
            description: "Desc".to_string(),
            canonical_url: None,
        };
        let style = ShellStyle {
            backdrop_padding: "3rem".to_string(),
            overlay: false,
            ..ShellStyle::default()
        };

        let html = renderer()
            .render_shell("<p>child</p>", &page, &ConfigData::from_config(&config), &style)
            .unwrap();

        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains("<title>Title &amp; more</title>"));
        assert!(html.contains("<p>child</p>"));
        assert!(html.contains("padding: 3rem"));
        assert!(!html.contains(r#"class="overlay""#));
        assert!(html.contains(r#"<a href="https://balasolu.com" rel="noopener">Home</a>"#));
        assert!(html.contains(r#"<a href="/">Blog</a>"#));
        assert!(html.contains("family=Akshar"));
        assert!(!html.contains("googletagmanager"));
    }

    #[test]
    fn test_analytics_only_when_injected() {
        let config = SiteConfig::default().with_analytics_id(Some("G-123".to_string()));
        let page = PageMeta {
            title: "t".to_string(),
            description: String::new(),
            canonical_url: Some("https://blog.balasolu.com/".to_string()),
        };
        let html = renderer()
            .render_shell("", &page, &ConfigData::from_config(&config), &config.shell)
            .unwrap();
        assert!(html.contains("gtag/js?id=G-123"));
        assert!(html.contains("gtag('config', 'G-123')"));
        assert!(html.contains(r#"<link rel="canonical" href="https://blog.balasolu.com/">"#));
    }

    #[test]
    fn test_render_post_fragment() {
        let post = PostData {
            title: "Hello".to_string(),
            description: None,
            display_date: None,
            datetime: String::new(),
            content: "<p>Body</p>".to_string(),
        };
        let html = renderer().render_post(&post).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(!html.contains("<time"));
        assert!(!html.contains(r#"class="description""#));
    }
}
