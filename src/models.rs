//! Data models for headlines and the digest built from them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`HeadlineItem`]: One headline as harvested from one source
//! - [`SourceHeadlines`]: The fetch stage's per-source result
//! - [`ConsolidatedItem`]: One story after duplicate headlines were merged
//! - [`ScoredItem`]: A consolidated story carrying its ranking score
//! - [`Digest`]: The ranked, size-bounded output of one run
//!
//! Everything here lives for a single run only; nothing is cached across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single headline attributed to one source.
///
/// Created once per fetched headline and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineItem {
    /// Name of the source that published the headline (e.g. `"Bloomberg"`).
    pub source: String,
    /// The headline text, already cleaned of markup by the fetch stage.
    pub headline: String,
    /// Publication timestamp, when the source exposes one.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Popularity signal (points, comments, shares), when the source exposes one.
    #[serde(default)]
    pub engagement: Option<f64>,
}

impl HeadlineItem {
    /// A headline with no timestamp and no engagement signal.
    pub fn new(source: impl Into<String>, headline: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            headline: headline.into(),
            published_at: None,
            engagement: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_engagement(mut self, engagement: f64) -> Self {
        self.engagement = Some(engagement);
        self
    }
}

/// Result of fetching one source: its name and the headlines that survived filtering.
///
/// A source that failed to fetch is represented with an empty `headlines` list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceHeadlines {
    pub source: String,
    pub headlines: Vec<HeadlineItem>,
}

/// One story after all duplicate headlines were folded together.
///
/// `sources` is a set, so a source contributing twice to the same story is
/// only counted once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedItem {
    /// The representative (longest) headline of the cluster.
    pub headline: String,
    /// Distinct source names that reported the story.
    pub sources: BTreeSet<String>,
    /// Newest publication time among the cluster members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Highest engagement among the cluster members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
}

impl ConsolidatedItem {
    /// Number of distinct sources; always at least 1 for an item built from a cluster.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

/// A consolidated story plus its ranking key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: ConsolidatedItem,
    pub score: f64,
}

/// The shape handed to the formatting and JSON collaborators.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DigestEntry {
    pub headline: String,
    pub sources: Vec<String>,
    pub score: f64,
}

impl From<&ScoredItem> for DigestEntry {
    fn from(scored: &ScoredItem) -> Self {
        Self {
            headline: scored.item.headline.clone(),
            sources: scored.item.sources.iter().cloned().collect(),
            score: scored.score,
        }
    }
}

/// The output of one run.
///
/// # Edition Naming
///
/// `edition` follows the same boundaries as [`crate::utils::time_of_day`]:
/// `"morning"`, `"afternoon"` or `"evening"`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    pub local_date: String,
    pub edition: String,
    pub items: Vec<DigestEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_headline_item_builder() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let item = HeadlineItem::new("CNBC", "Fed signals cut")
            .with_published_at(ts)
            .with_engagement(42.0);

        assert_eq!(item.source, "CNBC");
        assert_eq!(item.published_at, Some(ts));
        assert_eq!(item.engagement, Some(42.0));
    }

    #[test]
    fn test_headline_item_deserialization_defaults() {
        let json = r#"{"source": "WSJ", "headline": "Ethereum gains 5% today"}"#;
        let item: HeadlineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.headline, "Ethereum gains 5% today");
        assert!(item.published_at.is_none());
        assert!(item.engagement.is_none());
    }

    #[test]
    fn test_headline_item_camel_case_timestamp() {
        let json = r#"{"source": "WSJ", "headline": "x", "publishedAt": "2025-03-01T12:00:00Z"}"#;
        let item: HeadlineItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.published_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_source_count_dedupes() {
        let mut sources = BTreeSet::new();
        sources.insert("CNBC".to_string());
        sources.insert("CNBC".to_string());
        sources.insert("Bloomberg".to_string());
        let item = ConsolidatedItem {
            headline: "h".to_string(),
            sources,
            published_at: None,
            engagement: None,
        };
        assert_eq!(item.source_count(), 2);
    }

    #[test]
    fn test_digest_entry_from_scored() {
        let scored = ScoredItem {
            item: ConsolidatedItem {
                headline: "Story".to_string(),
                sources: ["WSJ".to_string(), "CNBC".to_string()].into_iter().collect(),
                published_at: None,
                engagement: None,
            },
            score: 4.65,
        };
        let entry = DigestEntry::from(&scored);
        assert_eq!(entry.sources, vec!["CNBC", "WSJ"]);
        assert_eq!(entry.score, 4.65);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"headline\":\"Story\""));
    }
}
