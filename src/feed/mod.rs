//! Post feed: orders entries newest first and projects them for display

mod instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;

use crate::content::ContentEntry;

pub use instant::parse_instant;

/// What the presentation layer needs to show one post in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    /// Identity of the source entry, never displayed
    pub key: String,
    pub link_target: String,
    pub heading: String,
    /// Present only when the entry has a non-empty description
    pub body: Option<String>,
}

impl From<&ContentEntry> for DisplayItem {
    fn from(entry: &ContentEntry) -> Self {
        Self {
            key: entry.id.clone(),
            link_target: entry.slug.clone(),
            heading: entry.title.clone(),
            body: entry
                .description
                .as_ref()
                .filter(|d| !d.is_empty())
                .cloned(),
        }
    }
}

/// Sort key for an entry: its instant, or `None` when the date is unusable.
///
/// `None` orders below every instant, so undated entries land at the end of
/// a newest-first feed.
pub fn sort_key(entry: &ContentEntry) -> Option<DateTime<Utc>> {
    parse_instant(&entry.date)
}

/// Entries ordered newest first.
///
/// The sort is stable: entries sharing an instant, and entries whose date
/// cannot be parsed, keep their incoming relative order.
pub fn sorted_entries(entries: &[ContentEntry]) -> Vec<&ContentEntry> {
    let mut keyed: Vec<_> = entries.iter().map(|e| (Reverse(sort_key(e)), e)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let undated = keyed.iter().filter(|(key, _)| key.0.is_none()).count();
    if undated > 0 {
        tracing::debug!("{} entries without a usable date placed last", undated);
    }

    keyed.into_iter().map(|(_, entry)| entry).collect()
}

/// Build the display feed for a set of entries.
///
/// Never fails and never drops entries: the output has one item per input
/// entry.
pub fn render_feed(entries: &[ContentEntry]) -> Vec<DisplayItem> {
    sorted_entries(entries)
        .into_iter()
        .map(DisplayItem::from)
        .collect()
}
