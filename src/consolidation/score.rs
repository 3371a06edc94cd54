//! Multi-factor importance scoring.
//!
//! ```text
//! score = sourceCount * sourceCountWeight
//!       + recencyScore * recencyWeight
//!       + engagementScore * engagementWeight
//! ```
//!
//! Missing timestamps and engagement signals fall back to fixed neutral
//! scores instead of failing.

use crate::config::ScoringConfig;
use crate::models::{ConsolidatedItem, ScoredItem};
use chrono::{DateTime, Utc};

/// Recency used when a story carries no publication time.
pub const UNKNOWN_RECENCY: f64 = 0.5;
/// Engagement score used when a story carries no engagement signal.
pub const UNKNOWN_ENGAGEMENT: f64 = 0.3;

/// Linear decay from 1.0 (published now) to 0.0 (`max_age_hours` old or older).
///
/// Timestamps in the future count as brand new.
pub fn recency_score(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>, max_age_hours: f64) -> f64 {
    match published_at {
        Some(ts) => {
            let age_hours = (now - ts).num_seconds() as f64 / 3600.0;
            (1.0 - age_hours / max_age_hours).clamp(0.0, 1.0)
        }
        None => UNKNOWN_RECENCY,
    }
}

/// `engagement / max_engagement`, capped at 1.0.
pub fn engagement_score(engagement: Option<f64>, max_engagement: f64) -> f64 {
    match engagement {
        Some(e) => (e / max_engagement).min(1.0),
        None => UNKNOWN_ENGAGEMENT,
    }
}

/// Score one consolidated story against `now`.
pub fn score(item: &ConsolidatedItem, config: &ScoringConfig, now: DateTime<Utc>) -> f64 {
    let recency = recency_score(item.published_at, now, config.max_age_hours);
    let engagement = engagement_score(item.engagement, config.max_engagement);

    item.source_count() as f64 * config.source_count_weight
        + recency * config.recency_weight
        + engagement * config.engagement_weight
}

/// Attach a score to every item, keeping their order.
pub fn score_all(items: Vec<ConsolidatedItem>, config: &ScoringConfig, now: DateTime<Utc>) -> Vec<ScoredItem> {
    items
        .into_iter()
        .map(|item| {
            let score = score(&item, config, now);
            ScoredItem { item, score }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn item(sources: &[&str], published_at: Option<DateTime<Utc>>, engagement: Option<f64>) -> ConsolidatedItem {
        ConsolidatedItem {
            headline: "story".to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            published_at,
            engagement,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_recency_decay() {
        let cfg = ScoringConfig::default();
        assert!(close(recency_score(Some(now()), now(), cfg.max_age_hours), 1.0));
        assert!(close(
            recency_score(Some(now() - Duration::hours(6)), now(), cfg.max_age_hours),
            0.75
        ));
        assert!(close(
            recency_score(Some(now() - Duration::hours(48)), now(), cfg.max_age_hours),
            0.0
        ));
        assert!(close(
            recency_score(Some(now() + Duration::hours(3)), now(), cfg.max_age_hours),
            1.0
        ));
        assert!(close(recency_score(None, now(), cfg.max_age_hours), UNKNOWN_RECENCY));
    }

    #[test]
    fn test_engagement_cap() {
        assert!(close(engagement_score(Some(250.0), 500.0), 0.5));
        assert!(close(engagement_score(Some(5000.0), 500.0), 1.0));
        assert!(close(engagement_score(None, 500.0), UNKNOWN_ENGAGEMENT));
    }

    #[test]
    fn test_score_with_defaults_only() {
        // 1 * 2.0 + 0.5 * 1.0 + 0.3 * 0.5
        let s = score(&item(&["WSJ"], None, None), &ScoringConfig::default(), now());
        assert!(close(s, 2.65));
    }

    #[test]
    fn test_corroborated_recent_story_beats_stale_single_source() {
        let cfg = ScoringConfig::default();
        let strong = item(
            &["Bloomberg", "CNBC"],
            Some(now() - Duration::hours(1)),
            Some(450.0),
        );
        let weak = item(&["WSJ"], Some(now() - Duration::hours(48)), Some(5.0));

        assert!(score(&strong, &cfg, now()) > score(&weak, &cfg, now()));
    }

    #[test]
    fn test_custom_weights() {
        let cfg = ScoringConfig {
            source_count_weight: 0.0,
            recency_weight: 0.0,
            engagement_weight: 1.0,
            ..ScoringConfig::default()
        };
        let s = score(&item(&["a", "b", "c"], None, Some(100.0)), &cfg, now());
        assert!(close(s, 100.0 / cfg.max_engagement));
    }

    #[test]
    fn test_score_all_keeps_order() {
        let scored = score_all(
            vec![item(&["a"], None, None), item(&["a", "b"], None, None)],
            &ScoringConfig::default(),
            now(),
        );
        assert_eq!(scored.len(), 2);
        assert!(close(scored[0].score, 2.65));
        assert!(close(scored[1].score, 4.65));
    }
}
