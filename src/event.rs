//! Mapping parsed feed items into output events.
//!
//! [`map_item`] is pure and total: every [`FeedItem`] becomes exactly one
//! [`Event`], absent optional fields stay absent, and nothing is filtered
//! or deduplicated here.

use crate::feed::FeedItem;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The unit handed to the downstream queue, one per feed item.
///
/// Serializes to a flat JSON object. `message` and `feed_url` are always
/// present; the remaining item fields appear only when the feed provided
/// them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Textual payload: the item's summary, falling back to its title.
    pub message: String,

    /// Provenance: the URL of the feed this item came from.
    pub feed_url: String,

    /// Stable item identifier (feed-provided or synthesized).
    pub guid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Map one feed item to one event.
pub fn map_item(item: FeedItem, source_url: &str) -> Event {
    let message = item
        .summary
        .or_else(|| item.title.clone())
        .unwrap_or_default();

    Event {
        message,
        feed_url: source_url.to_string(),
        guid: item.guid,
        title: item.title,
        link: item.link,
        published: item.published,
        author: item.author,
    }
}

// ============================================================================
// Tests
// ============================================================================
