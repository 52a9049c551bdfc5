//! Generator module - writes the static site using the built-in templates

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::ContentEntry;
use crate::feed::{self, DisplayItem};
use crate::helpers::{
    absolutize_urls, date_xml, escape_xml, format_date, full_url_for, strip_invalid_xml_chars,
};
use crate::templates::{ConfigData, PageMeta, PostData, TemplateRenderer, STYLESHEET};
use crate::Blog;

/// Display format for post dates
const POST_DATE_FORMAT: &str = "MMMM DD, YYYY";

const INDEX_PAGE: &str = "index.html";
const ATOM_FEED: &str = "atom.xml";
const STYLESHEET_PATH: &str = "css/style.css";

/// Files the generator writes itself; no post may be placed on top of them
pub const RESERVED_OUTPUTS: &[&str] = &[INDEX_PAGE, ATOM_FEED, STYLESHEET_PATH];

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    config_data: ConfigData,
}

/// What a generation run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub posts: usize,
    pub assets: usize,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        let config_data = ConfigData::from_config(&blog.config);

        Ok(Self {
            blog: blog.clone(),
            renderer,
            config_data,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, entries: &[ContentEntry]) -> Result<GenerateSummary> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.write_stylesheet()?;
        let assets = self.copy_static_assets()?;

        let feed = feed::render_feed(entries);

        self.generate_index(&feed)?;

        for entry in feed::sorted_entries(entries) {
            self.generate_post(entry)?;
        }

        self.generate_atom_feed(entries)?;

        Ok(GenerateSummary {
            posts: entries.len(),
            assets,
        })
    }

    /// Write a page, creating parent directories as needed
    fn write_page(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Generate the blog index listing every post
    fn generate_index(&self, feed: &[DisplayItem]) -> Result<()> {
        let children = self.renderer.render_feed(feed)?;
        let page = PageMeta {
            title: self.blog.config.title.clone(),
            description: self.blog.config.description.clone(),
            canonical_url: Some(full_url_for(&self.blog.config, "/")),
        };

        let html = self.renderer.render_shell(
            &children,
            &page,
            &self.config_data,
            &self.blog.config.shell,
        )?;
        self.write_page(Path::new(INDEX_PAGE), &html)
    }

    /// Generate the page for one post
    fn generate_post(&self, entry: &ContentEntry) -> Result<()> {
        let instant = feed::sort_key(entry);
        let post = PostData {
            title: entry.title.clone(),
            description: entry.description.clone().filter(|d| !d.is_empty()),
            display_date: instant.map(|dt| format_date(&dt, POST_DATE_FORMAT)),
            datetime: instant.map(|dt| date_xml(&dt)).unwrap_or_default(),
            content: entry.content.clone(),
        };

        let children = self.renderer.render_post(&post)?;
        let page = PageMeta {
            title: format!("{} | {}", entry.title, self.blog.config.title),
            description: post
                .description
                .clone()
                .unwrap_or_else(|| self.blog.config.description.clone()),
            canonical_url: Some(full_url_for(&self.blog.config, &entry.slug)),
        };

        let html = self.renderer.render_shell(
            &children,
            &page,
            &self.config_data,
            &self.blog.config.shell,
        )?;
        self.write_page(&entry.output_path(), &html)
    }

    /// Generate Atom feed from the newest posts
    fn generate_atom_feed(&self, entries: &[ContentEntry]) -> Result<()> {
        let config = &self.blog.config;
        let generated_at = chrono::Utc::now();
        let sorted = feed::sorted_entries(entries);

        let updated = sorted
            .first()
            .and_then(|entry| feed::sort_key(entry))
            .unwrap_or(generated_at);

        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        xml.push('\n');
        xml.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        xml.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            escape_xml(&full_url_for(config, &format!("/{}", ATOM_FEED)))
        ));
        xml.push_str(&format!(
            "  <link href=\"{}\"/>\n",
            escape_xml(&full_url_for(config, "/"))
        ));
        xml.push_str(&format!("  <updated>{}</updated>\n", date_xml(&updated)));
        xml.push_str(&format!(
            "  <id>{}</id>\n",
            escape_xml(&full_url_for(config, "/"))
        ));
        xml.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for entry in sorted.iter().take(config.feed_limit) {
            let link = escape_xml(&full_url_for(config, &entry.slug));
            let entry_updated = feed::sort_key(entry).unwrap_or(generated_at);

            xml.push_str("  <entry>\n");
            xml.push_str(&format!("    <title>{}</title>\n", escape_xml(&entry.title)));
            xml.push_str(&format!("    <link href=\"{}\"/>\n", link));
            xml.push_str(&format!("    <id>{}</id>\n", link));
            xml.push_str(&format!(
                "    <updated>{}</updated>\n",
                date_xml(&entry_updated)
            ));
            if let Some(summary) = entry.description.as_deref().filter(|d| !d.is_empty()) {
                xml.push_str(&format!("    <summary>{}</summary>\n", escape_xml(summary)));
            }
            let content = strip_invalid_xml_chars(&absolutize_urls(&entry.content, &config.url));
            xml.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                content.replace("]]>", "]]]]><![CDATA[>")
            ));
            xml.push_str("  </entry>\n");
        }

        xml.push_str("</feed>\n");

        self.write_page(Path::new(ATOM_FEED), &xml)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Write the embedded stylesheet
    fn write_stylesheet(&self) -> Result<()> {
        self.write_page(Path::new(STYLESHEET_PATH), STYLESHEET)
    }

    /// Copy everything under the static directory into the output verbatim
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = self.blog.static_dir();
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(&static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&static_dir)?;
            // Hidden files such as .DS_Store stay behind
            if relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            {
                continue;
            }

            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static assets", copied);
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn blog() -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    fn entries() -> Vec<ContentEntry> {
        let mut old = ContentEntry::new("posts/a.md", "Old Post", "/posts/a", "2023-01-01")
            .with_description("d1");
        old.content = r#"<p>See <a href="/posts/b">b</a></p>"#.to_string();
        let new = ContentEntry::new("posts/b.md", "New Post", "/posts/b", "2023-06-01");
        let undated = ContentEntry::new("posts/c.md", "Undated", "/posts/c", "whenever");
        vec![old, new, undated]
    }

    #[test]
    fn test_generate_writes_pages() {
        let (_dir, blog) = blog();
        let summary = Generator::new(&blog).unwrap().generate(&entries()).unwrap();
        assert_eq!(summary.posts, 3);

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        let new_pos = index.find("New Post").unwrap();
        let old_pos = index.find("Old Post").unwrap();
        let undated_pos = index.find("Undated").unwrap();
        assert!(new_pos < old_pos && old_pos < undated_pos);
        assert!(index.contains("<p>d1</p>"));

        let post = fs::read_to_string(blog.public_dir.join("posts/b/index.html")).unwrap();
        assert!(post.contains("<h1>New Post</h1>"));
        assert!(post.contains("June 01, 2023"));

        let undated = fs::read_to_string(blog.public_dir.join("posts/c/index.html")).unwrap();
        assert!(!undated.contains("<time"));

        assert!(blog.public_dir.join("css/style.css").exists());
    }

    #[test]
    fn test_atom_feed() {
        let (_dir, blog) = blog();
        Generator::new(&blog).unwrap().generate(&entries()).unwrap();

        let atom = fs::read_to_string(blog.public_dir.join("atom.xml")).unwrap();
        assert_eq!(atom.matches("<entry>").count(), 3);
        assert!(atom.contains("<link href=\"https://blog.balasolu.com/posts/b\"/>"));
        assert!(atom.contains("<updated>2023-06-01T00:00:00+00:00</updated>"));
        assert!(atom.contains("<summary>d1</summary>"));
        assert!(atom.contains(r#"href="https://blog.balasolu.com/posts/b""#));
        assert!(atom.find("New Post").unwrap() < atom.find("Old Post").unwrap());
    }

    #[test]
    fn test_atom_feed_limit() {
        let (dir, _) = blog();
        fs::write(dir.path().join("_config.yml"), "feed_limit: 1\n").unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        Generator::new(&blog).unwrap().generate(&entries()).unwrap();

        let atom = fs::read_to_string(blog.public_dir.join("atom.xml")).unwrap();
        assert_eq!(atom.matches("<entry>").count(), 1);
        assert!(atom.contains("New Post"));
    }

    #[test]
    fn test_copy_static_assets() {
        let (dir, blog) = blog();
        let static_dir = dir.path().join("static/img");
        fs::create_dir_all(&static_dir).unwrap();
        fs::write(static_dir.join("logo.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("static/.DS_Store"), "junk").unwrap();

        let summary = Generator::new(&blog).unwrap().generate(&[]).unwrap();
        assert_eq!(summary.assets, 1);
        assert!(blog.public_dir.join("img/logo.svg").exists());
        assert!(!blog.public_dir.join(".DS_Store").exists());
    }

    #[test]
    fn test_empty_site() {
        let (_dir, blog) = blog();
        Generator::new(&blog).unwrap().generate(&[]).unwrap();
        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(!index.contains("<article"));
        let atom = fs::read_to_string(blog.public_dir.join("atom.xml")).unwrap();
        assert!(!atom.contains("<entry>"));
    }
}
