//! Lenient RSS/Atom parsing.
//!
//! The contract here is load-bearing: [`parse_items`] never fails. A feed
//! body that is not valid XML, has the wrong root element, or is truncated
//! yields an empty item list, exactly like a well-formed feed with zero
//! entries. The parse error detail goes only to the diagnostic log.

use chrono::{DateTime, Utc};
use feed_rs::parser;
use sha2::{Digest, Sha256};

/// One entry of a parsed feed, in document order.
///
/// Every field except `guid` is optional: feeds routinely omit any of
/// them, and a missing subfield is never a parse failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Entry id when the feed provides one, else a stable hash of
    /// link, title, and publish time.
    pub guid: String,
    pub title: Option<String>,
    /// Entry summary, falling back to the full content body.
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

/// Parse a raw feed body into items, in document order.
///
/// RSS 2.0 and Atom are auto-detected from the content. Anything that
/// fails structural parsing (malformed XML, an unrecognized root element,
/// a truncated document) is logged at debug level and returned as an
/// empty list; callers cannot distinguish it from a valid empty feed.
pub fn parse_items(bytes: &[u8]) -> Vec<FeedItem> {
    let feed = match parser::parse(bytes) {
        Ok(feed) => feed,
        Err(e) => {
            tracing::debug!(error = %e, "Feed body did not parse, yielding no items");
            return Vec::new();
        }
    };

    feed.entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let published = entry.published.or(entry.updated);
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));
            let title = entry.title.map(|t| t.content);
            let author = entry
                .authors
                .into_iter()
                .map(|p| p.name)
                .find(|name| !name.trim().is_empty());

            let existing_id = if entry.id.is_empty() {
                None
            } else {
                Some(entry.id.as_str())
            };
            let guid = generate_guid(
                existing_id,
                link.as_deref(),
                title.as_deref().unwrap_or(""),
                published,
            );

            FeedItem {
                guid,
                title,
                summary,
                link,
                published,
                author,
            }
        })
        .collect()
}

fn generate_guid(
    existing: Option<&str>,
    link: Option<&str>,
    title: &str,
    published: Option<DateTime<Utc>>,
) -> String {
    if let Some(guid) = existing {
        let trimmed = guid.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let input = format!(
        "{}|{}|{}",
        link.unwrap_or(""),
        title,
        published.map(|p| p.timestamp().to_string()).unwrap_or_default()
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}

// ============================================================================
// Tests
// ============================================================================
