//! Headline sources: fetching, retrying and filtering.
//!
//! The consolidation engine never talks to the network. This module is the
//! collaborator that does, behind the [`HeadlineFetcher`] trait so tests and
//! offline runs can swap in something else.
//!
//! # Supported Source Kinds
//!
//! | Kind | Extraction | Timestamp | Engagement |
//! |------|------------|-----------|------------|
//! | `rss` | `<item><title>` | `<pubDate>` | - |
//! | `html` | text of elements matching `selector` | - | - |
//! | `search` | `articles[].title` or `hits[].title` | `publishedAt` / `created_at` | `points` |
//!
//! Sources are fetched one after another with a courtesy delay in between.
//! A source that fails contributes zero headlines; the run carries on.

pub mod batch;
pub mod filter;
pub mod http;
pub mod retry;

use crate::config::{ConfigError, FilterConfig, SourceConfig};
use crate::models::{HeadlineItem, SourceHeadlines};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("could not parse {kind} response: {reason}")]
    Parse { kind: &'static str, reason: String },

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FetchError {
    /// Whether trying again could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Parse { .. } | FetchError::Selector(_) | FetchError::Config(_) => false,
        }
    }
}

/// Something that can produce the raw headlines of one configured source.
pub trait HeadlineFetcher {
    /// Fetch and extract headlines for `source`.
    ///
    /// Returned items are unfiltered; [`collect_headlines`] applies the
    /// configured [`FilterConfig`] afterwards.
    async fn fetch_headlines(&self, source: &SourceConfig) -> Result<Vec<HeadlineItem>, FetchError>;
}

/// Fetch every source in order, waiting `delay` between them.
///
/// Always returns one entry per source, in configuration order.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn collect_headlines<F: HeadlineFetcher>(
    fetcher: &F,
    sources: &[SourceConfig],
    filter: &FilterConfig,
    delay: Duration,
) -> Vec<SourceHeadlines> {
    let results: Vec<SourceHeadlines> = stream::iter(sources.iter().enumerate())
        .then(|(i, source)| async move {
            if i > 0 && !delay.is_zero() {
                sleep(delay).await;
            }

            let headlines = match fetcher.fetch_headlines(source).await {
                Ok(raw) => {
                    let fetched = raw.len();
                    let kept = filter::apply(raw, filter);
                    info!(
                        source = %source.name,
                        fetched,
                        kept = kept.len(),
                        "Collected headlines"
                    );
                    kept
                }
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Fetch failed; source contributes no headlines");
                    Vec::new()
                }
            };

            SourceHeadlines {
                source: source.name.clone(),
                headlines,
            }
        })
        .collect()
        .await;

    let total: usize = results.iter().map(|r| r.headlines.len()).sum();
    info!(total, "Finished collecting headlines");
    results
}
