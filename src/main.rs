//! # Headline Digest
//!
//! A scheduled news digest: scrapes headlines from a handful of sources,
//! folds duplicate stories together, ranks them and writes a short digest
//! for a separate delivery script to forward.
//!
//! ## Usage
//!
//! ```sh
//! headline_digest -c config.yaml -o digest.txt
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Collecting**: Fetch each configured source in turn (RSS, HTML or search API)
//! 2. **Filtering**: Clean headlines and apply length and keyword rules per source
//! 3. **Consolidating**: Cluster near-duplicates, score and keep the top stories
//! 4. **Output**: Write the plain-text digest and, optionally, a dated JSON copy

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod consolidation;
mod models;
mod outputs;
mod sources;
mod utils;

use cli::Cli;
use config::Config;
use models::HeadlineItem;
use sources::http::HttpFetcher;
use sources::retry::RetryFetcher;
use utils::{ensure_writable_dir, time_of_day, truncate_for_log};

/// Config file picked up when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// First wait of the retry backoff.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_digest starting up");

    let args = Cli::parse();
    debug!(?args.config, %args.output, ?args.json_output_dir, ?args.input, "Parsed CLI arguments");

    // ---- Configuration ----
    let config = match &args.config {
        Some(path) => Config::load(path).await?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH).await?,
        None => {
            warn!("No config file found; using defaults with no sources");
            Config::default()
        }
    };

    // Early check: fail before fetching anything if outputs cannot be written
    if let Some(dir) = Path::new(&args.output).parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir.display(), error = %e, "Digest output directory is not writable");
            return Err(e);
        }
    }
    if let Some(ref dir) = args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    // ---- Collect headlines ----
    let collected = match &args.input {
        Some(path) => sources::batch::load_batch(path, &config.filter).await?,
        None => {
            let fetcher = RetryFetcher::new(
                HttpFetcher::new(&config.fetch, args.search_api_key.clone())?,
                config.fetch.retries,
                RETRY_BASE_DELAY,
            );
            sources::collect_headlines(
                &fetcher,
                &config.sources,
                &config.filter,
                Duration::from_millis(config.fetch.delay_ms),
            )
            .await
        }
    };

    for result in &collected {
        info!(source = %result.source, count = result.headlines.len(), "Source contribution");
    }
    let items: Vec<HeadlineItem> = collected.into_iter().flat_map(|r| r.headlines).collect();
    info!(count = items.len(), "Total headlines to consolidate");

    // ---- Consolidate ----
    let now = Utc::now();
    let ranked = consolidation::run(&items, &config.engine, now);
    for (i, story) in ranked.iter().enumerate() {
        info!(
            rank = i + 1,
            score = story.score,
            sources = story.item.source_count(),
            headline = %truncate_for_log(&story.item.headline, 120),
            "Selected story"
        );
    }

    // ---- Output ----
    let digest = outputs::build_digest(&ranked, now, time_of_day());
    outputs::digest::write_digest(&digest, &args.output).await?;

    if let Some(ref dir) = args.json_output_dir {
        if let Err(e) = outputs::json::write_digest(&digest, dir).await {
            error!(error = %e, "Failed to write JSON digest");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        stories = digest.items.len(),
        edition = %digest.edition,
        "Execution complete"
    );

    Ok(())
}
