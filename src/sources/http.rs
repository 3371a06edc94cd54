//! HTTP fetcher for RSS feeds, HTML front pages and JSON search APIs.
//!
//! Extraction is deliberately plain: one rule per source kind, no per-site
//! heuristics. Parsing lives in synchronous helpers so it can be tested on
//! inline fixtures without a network.

use super::{FetchError, HeadlineFetcher};
use crate::config::{FetchConfig, SourceConfig, SourceKind};
use crate::models::HeadlineItem;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Selector used for HTML sources that do not configure one.
pub const DEFAULT_SELECTOR: &str = "h1, h2, h3";

/// Header carrying the search API key, when one is configured.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Fetches sources over HTTP with a shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    api_key: Option<String>,
}

impl HttpFetcher {
    /// Build a fetcher with the configured timeout and user agent.
    ///
    /// # Arguments
    ///
    /// * `config` - Timeout and user agent for every request
    /// * `api_key` - Sent only to [`SourceKind::Search`] sources
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: &FetchConfig, api_key: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, api_key })
    }
}

impl HeadlineFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn fetch_headlines(&self, source: &SourceConfig) -> Result<Vec<HeadlineItem>, FetchError> {
        let url = source.request_url()?;
        let t0 = Instant::now();

        let mut request = self.client.get(url.clone());
        if let (SourceKind::Search, Some(key)) = (source.kind, &self.api_key) {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Downloaded source"
        );

        match source.kind {
            SourceKind::Rss => parse_rss(&source.name, &body),
            SourceKind::Html => parse_html(
                &source.name,
                &body,
                source.selector.as_deref().unwrap_or(DEFAULT_SELECTOR),
            ),
            SourceKind::Search => parse_search(&source.name, &body),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
}

/// Extract `<item>` titles (and `pubDate`, when it parses) from an RSS 2.0 feed.
///
/// Items without a title are skipped. Other channel elements may sit between
/// items.
///
/// # Arguments
///
/// * `source` - Name attached to every extracted item
/// * `xml` - The feed body
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the body is not a well-formed RSS document.
pub fn parse_rss(source: &str, xml: &str) -> Result<Vec<HeadlineItem>, FetchError> {
    let doc: RssDocument = quick_xml::de::from_str(xml).map_err(|e| FetchError::Parse {
        kind: "rss",
        reason: e.to_string(),
    })?;

    Ok(doc
        .channel
        .items
        .into_iter()
        .filter_map(|item| {
            let title = item.title?;
            let mut headline = HeadlineItem::new(source, title.trim());
            if let Some(ts) = item
                .pub_date
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
            {
                headline = headline.with_published_at(ts.with_timezone(&Utc));
            }
            Some(headline)
        })
        .collect())
}

/// Extract the text of every element matching `selector`.
///
/// # Arguments
///
/// * `source` - Name attached to every extracted item
/// * `html` - The page body
/// * `selector` - CSS selector for headline elements
///
/// # Returns
///
/// One item per matching element with non-blank text, in document order.
///
/// # Errors
///
/// Returns [`FetchError::Selector`] if `selector` is not valid CSS.
pub fn parse_html(source: &str, html: &str, selector: &str) -> Result<Vec<HeadlineItem>, FetchError> {
    let selector =
        Selector::parse(selector).map_err(|e| FetchError::Selector(format!("{selector}: {e}")))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .map(|text| HeadlineItem::new(source, text))
        .collect())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(alias = "hits", default)]
    articles: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "publishedAt", alias = "created_at")]
    published_at: Option<String>,
    #[serde(default, alias = "points")]
    engagement: Option<f64>,
}

/// Extract titles from a search API response shaped like
/// `{"articles": [{"title", "publishedAt"}]}` or `{"hits": [{"title", "created_at", "points"}]}`.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the body is not JSON of that shape.
pub fn parse_search(source: &str, json: &str) -> Result<Vec<HeadlineItem>, FetchError> {
    let response: SearchResponse = serde_json::from_str(json).map_err(|e| FetchError::Parse {
        kind: "search",
        reason: e.to_string(),
    })?;

    Ok(response
        .articles
        .into_iter()
        .filter_map(|hit| {
            let title = hit.title?;
            let mut headline = HeadlineItem::new(source, title.trim());
            if let Some(ts) = hit
                .published_at
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            {
                headline = headline.with_published_at(ts.with_timezone(&Utc));
            }
            if let Some(engagement) = hit.engagement {
                headline = headline.with_engagement(engagement);
            }
            Some(headline)
        })
        .collect())
}
