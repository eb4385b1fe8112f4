//! Polls an RSS/Atom feed on a fixed interval and emits one event per item.
//!
//! Each tick of the poll loop runs one pass of the pipeline:
//!
//! ```text
//! timer → fetch (HTTP GET) → parse (RSS/Atom) → map → event queue
//! ```
//!
//! The loop is deliberately forgiving: a failed fetch skips the tick and
//! retries at the next interval, and a malformed feed body parses to zero
//! items instead of an error. Only invalid configuration is fatal, and
//! only at construction time.
//!
//! # Quick start
//!
//! ```no_run
//! use feedpoll::{FeedConfig, Poller};
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), feedpoll::ConfigError> {
//! let config = FeedConfig::new("https://example.com/feed.xml", Duration::from_secs(600))?;
//! let (events_tx, mut events_rx) = mpsc::channel(256);
//!
//! let handle = Poller::new(config, events_tx).start();
//! while let Some(event) = events_rx.recv().await {
//!     println!("{}", event.message);
//! }
//! handle.stop();
//! handle.stopped().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod event;
pub mod feed;
pub mod poll;

pub use config::{ConfigError, FeedConfig};
pub use event::{map_item, Event};
pub use feed::{FeedItem, FetchError};
pub use poll::{PollHandle, PollState, Poller};
