//! Collapse a cluster into one consolidated story.

use super::cluster::Cluster;
use crate::models::ConsolidatedItem;
use std::collections::BTreeSet;

/// Build the [`ConsolidatedItem`] for one cluster.
///
/// The representative headline is the longest member by character count; on
/// a tie the earlier member wins. `sources` covers every member, not just the
/// representative. The newest timestamp and the highest engagement of any
/// member are carried along for scoring.
pub fn consolidate(cluster: &Cluster<'_>) -> ConsolidatedItem {
    let members = cluster.members();

    let mut representative = cluster.seed();
    let mut best_len = representative.headline.chars().count();
    for &member in &members[1..] {
        let len = member.headline.chars().count();
        if len > best_len {
            representative = member;
            best_len = len;
        }
    }

    let sources: BTreeSet<String> = members.iter().map(|m| m.source.clone()).collect();
    let published_at = members.iter().filter_map(|m| m.published_at).max();
    let engagement = members
        .iter()
        .filter_map(|m| m.engagement)
        .fold(None, |best: Option<f64>, e| Some(best.map_or(e, |b| b.max(e))));

    tracing::debug!(
        headline = %representative.headline,
        members = members.len(),
        sources = sources.len(),
        "Consolidated cluster"
    );

    ConsolidatedItem {
        headline: representative.headline.clone(),
        sources,
        published_at,
        engagement,
    }
}
