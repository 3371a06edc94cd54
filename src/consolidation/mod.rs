//! News consolidation engine.
//!
//! Turns a flat batch of headlines from several sources into a short ranked
//! digest. Data flows strictly left to right and nothing is kept between runs:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Normalize | [`normalize`] | token list per headline |
//! | Compare | [`similarity`] | Jaccard coefficient |
//! | Group | [`cluster`] | seed-anchored clusters |
//! | Collapse | [`consolidate`] | one item per cluster |
//! | Score | [`score`] | weighted importance |
//! | Rank | [`rank`] | top-N, stable by score |
//!
//! Every stage is a total function: empty batches, empty headlines and odd
//! thresholds produce (possibly empty) output, never errors.

pub mod cluster;
pub mod consolidate;
pub mod normalize;
pub mod rank;
pub mod score;
pub mod similarity;

use crate::config::EngineConfig;
use crate::models::{HeadlineItem, ScoredItem};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Run the whole engine over one batch.
///
/// `now` is the reference time for recency; pass the same value to get the
/// same digest twice.
#[instrument(level = "debug", skip_all, fields(items = items.len()))]
pub fn run(items: &[HeadlineItem], config: &EngineConfig, now: DateTime<Utc>) -> Vec<ScoredItem> {
    let clusters = cluster::cluster(items, config.similarity_threshold);
    debug!(
        clusters = clusters.len(),
        threshold = config.similarity_threshold,
        "Clustered headlines"
    );

    let consolidated = clusters.iter().map(consolidate::consolidate).collect();
    let scored = score::score_all(consolidated, &config.scoring, now);
    let ranked = rank::rank(scored, config.max_items);
    debug!(kept = ranked.len(), max_items = config.max_items, "Ranked stories");

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn config(max_items: usize, threshold: f64) -> EngineConfig {
        EngineConfig {
            max_items,
            similarity_threshold: threshold,
            scoring: ScoringConfig::default(),
        }
    }

    #[test]
    fn test_scenario_fed_rate_cut_clusters() {
        let items = vec![
            HeadlineItem::new("Bloomberg", "Federal Reserve signals rate cut in March"),
            HeadlineItem::new("CNBC", "Fed Chair signals rate cut coming in March"),
            HeadlineItem::new("WSJ", "Ethereum gains 5% today"),
        ];
        let digest = run(&items, &config(10, 0.35), now());

        assert_eq!(digest.len(), 2);
        assert_eq!(digest[0].item.source_count(), 2);
        assert_eq!(digest[0].item.headline, "Fed Chair signals rate cut coming in March");
        assert_eq!(digest[1].item.source_count(), 1);
        assert_eq!(digest[1].item.headline, "Ethereum gains 5% today");
    }

    #[test]
    fn test_scenario_corroboration_outranks_stale_story() {
        let items = vec![
            HeadlineItem::new("WSJ", "Oil slides after inventory build")
                .with_published_at(now() - Duration::hours(48))
                .with_engagement(3.0),
            HeadlineItem::new("Bloomberg", "Apple unveils new iPhone lineup")
                .with_published_at(now() - Duration::hours(1))
                .with_engagement(480.0),
            HeadlineItem::new("CNBC", "Apple unveils new iPhone lineup today")
                .with_published_at(now() - Duration::hours(2)),
        ];
        let digest = run(&items, &config(3, 0.5), now());

        assert_eq!(digest.len(), 2);
        assert_eq!(digest[0].item.source_count(), 2);
        assert!(digest[0].score > digest[1].score);
        assert_eq!(digest[1].item.headline, "Oil slides after inventory build");
    }

    #[test]
    fn test_scenario_truncates_to_top_three() {
        let items = vec![
            HeadlineItem::new("A", "Tesla recalls vehicles"),
            HeadlineItem::new("A", "Bitcoin hits record high"),
            HeadlineItem::new("B", "Bitcoin hits record high again"),
            HeadlineItem::new("A", "Nvidia earnings beat estimates"),
            HeadlineItem::new("B", "Nvidia earnings beat estimates handily"),
            HeadlineItem::new("C", "Nvidia earnings beat forecasts estimates"),
            HeadlineItem::new("A", "Gold steady ahead of payrolls"),
            HeadlineItem::new("A", "Housing starts fall sharply"),
        ];
        let digest = run(&items, &config(3, 0.5), now());

        assert_eq!(digest.len(), 3);
        assert_eq!(digest[0].item.source_count(), 3);
        assert_eq!(digest[1].item.source_count(), 2);
        // Three single-source stories tie; the earliest wins the last slot.
        assert_eq!(digest[2].item.headline, "Tesla recalls vehicles");
        assert!(digest.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_scenario_empty_batch() {
        assert!(run(&[], &config(3, 0.5), now()).is_empty());
    }

    #[test]
    fn test_zero_max_items_means_no_output() {
        let items = vec![HeadlineItem::new("A", "Tesla recalls vehicles")];
        assert!(run(&items, &config(0, 0.5), now()).is_empty());
    }

    #[test]
    fn test_run_is_idempotent() {
        let items = vec![
            HeadlineItem::new("Bloomberg", "Federal Reserve signals rate cut in March"),
            HeadlineItem::new("CNBC", "Fed Chair signals rate cut coming in March"),
            HeadlineItem::new("WSJ", "Ethereum gains 5% today").with_engagement(20.0),
            HeadlineItem::new("Reuters", "Gold steady ahead of payrolls")
                .with_published_at(now() - Duration::hours(3)),
        ];
        let cfg = config(3, 0.35);
        assert_eq!(run(&items, &cfg, now()), run(&items, &cfg, now()));
    }
}
