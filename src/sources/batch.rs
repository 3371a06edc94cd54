//! Offline input: a JSON batch standing in for the fetch stage.
//!
//! ```json
//! [
//!   {"source": "Bloomberg", "headlines": ["Federal Reserve signals rate cut in March"]},
//!   {"source": "HackerNews", "headlines": [
//!     {"headline": "Bitcoin hits record high", "publishedAt": "2025-03-10T11:00:00Z", "engagement": 312}
//!   ]}
//! ]
//! ```
//!
//! Plain strings and full objects can be mixed. The `source` of an object is
//! always taken from its enclosing entry.

use crate::config::FilterConfig;
use crate::models::{HeadlineItem, SourceHeadlines};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct BatchEntry {
    source: String,
    #[serde(default)]
    headlines: Vec<BatchHeadline>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchHeadline {
    Text(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        headline: String,
        #[serde(default)]
        published_at: Option<DateTime<Utc>>,
        #[serde(default)]
        engagement: Option<f64>,
    },
}

/// Parse a batch document and run every entry through the headline filter.
pub fn parse_batch(json: &str, filter: &FilterConfig) -> Result<Vec<SourceHeadlines>, serde_json::Error> {
    let entries: Vec<BatchEntry> = serde_json::from_str(json)?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            let items = entry
                .headlines
                .into_iter()
                .map(|h| match h {
                    BatchHeadline::Text(headline) => HeadlineItem::new(&entry.source, headline),
                    BatchHeadline::Detailed {
                        headline,
                        published_at,
                        engagement,
                    } => HeadlineItem {
                        source: entry.source.clone(),
                        headline,
                        published_at,
                        engagement,
                    },
                })
                .collect();
            SourceHeadlines {
                headlines: super::filter::apply(items, filter),
                source: entry.source,
            }
        })
        .collect())
}

/// Read a batch file from disk.
///
/// # Arguments
///
/// * `path` - JSON batch file
/// * `filter` - Upstream filter applied to each source's headlines
///
/// # Returns
///
/// One [`SourceHeadlines`] per batch entry, in file order.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid batch.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_batch(
    path: impl AsRef<Path>,
    filter: &FilterConfig,
) -> Result<Vec<SourceHeadlines>, Box<dyn Error>> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    let batch = parse_batch(&text, filter)?;
    info!(sources = batch.len(), "Loaded offline batch");
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mixed_batch() {
        let json = r#"[
            {"source": "Bloomberg", "headlines": ["Federal Reserve signals rate cut in March"]},
            {"source": "HackerNews", "headlines": [
                {"headline": "Bitcoin hits record high", "publishedAt": "2025-03-10T11:00:00Z", "engagement": 312},
                "Show HN: a tiny headline digest"
            ]},
            {"source": "Empty"}
        ]"#;
        let batch = parse_batch(json, &FilterConfig::default()).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].headlines[0].source, "Bloomberg");
        let hn = &batch[1].headlines;
        assert_eq!(hn.len(), 2);
        assert_eq!(hn[0].source, "HackerNews");
        assert_eq!(hn[0].engagement, Some(312.0));
        assert_eq!(
            hn[0].published_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap())
        );
        assert!(hn[1].published_at.is_none());
        assert!(batch[2].headlines.is_empty());
    }

    #[test]
    fn test_batch_is_filtered() {
        let json = r#"[{"source": "A", "headlines": ["tiny", "Markets rally on jobs data"]}]"#;
        let batch = parse_batch(json, &FilterConfig::default()).unwrap();
        assert_eq!(batch[0].headlines.len(), 1);
    }

    #[test]
    fn test_invalid_batch() {
        assert!(parse_batch(r#"{"source": "A"}"#, &FilterConfig::default()).is_err());
    }
}
