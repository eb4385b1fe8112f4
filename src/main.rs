use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use feedpoll::{Event, FeedConfig, Poller};

#[derive(Parser, Debug)]
#[command(
    name = "feedpoll",
    about = "Polls an RSS/Atom feed and prints one JSON event per item"
)]
struct Args {
    /// Feed URL to poll
    #[arg(long, conflicts_with = "config")]
    url: Option<String>,

    /// Poll interval in seconds
    #[arg(long, default_value_t = 600, conflicts_with = "config")]
    interval: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, conflicts_with = "config")]
    timeout: u64,

    /// Load settings from a TOML config file instead of flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Queue capacity between the poll loop and stdout. Bounded so a stalled
/// consumer exerts backpressure on the loop instead of growing memory.
const EVENT_QUEUE_CAPACITY: usize = 256;

fn build_config(args: &Args) -> Result<FeedConfig> {
    if let Some(path) = &args.config {
        return FeedConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let url = args
        .url
        .as_deref()
        .context("Either --url or --config is required")?;

    FeedConfig::with_timeout(
        url,
        Duration::from_secs(args.interval),
        Duration::from_secs(args.timeout),
    )
    .context("Invalid configuration")
}

fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the event stream.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let (events_tx, mut events_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let handle = Poller::new(config, events_tx).start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, stopping poller");
                break;
            }
            maybe_event = events_rx.recv() => {
                match maybe_event {
                    Some(event) => print_event(&event),
                    None => break,
                }
            }
        }
    }

    handle.stop();

    // Drain whatever the in-flight tick pushed before the loop observed
    // the stop; recv() yields None once the loop task has exited.
    while let Some(event) = events_rx.recv().await {
        print_event(&event);
    }
    handle.stopped().await;

    Ok(())
}
