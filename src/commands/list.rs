//! List posts in feed order

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::ContentEntry;
use crate::feed;
use crate::Blog;

/// Print every post the way the index orders them
pub fn run(blog: &Blog) -> Result<()> {
    let entries = ContentLoader::new(blog).load_entries()?;
    let lines = format_listing(&entries);

    println!("Posts ({}):", entries.len());
    for line in lines {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per post: date, title, link
pub fn format_listing(entries: &[ContentEntry]) -> Vec<String> {
    feed::sorted_entries(entries)
        .into_iter()
        .map(|entry| {
            let date = feed::sort_key(entry)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            format!("{} - {} [{}]", date, entry.title, entry.slug)
        })
        .collect()
}
