//! Seed-anchored grouping of headlines that report the same story.
//!
//! Items are visited in input order. Each unassigned item seeds a new cluster
//! and pulls in every later unassigned item whose similarity *to the seed*
//! reaches the threshold. Members are never compared with each other, so the
//! grouping is not transitive: A~B and B~C does not put C with A unless A~C.

use super::similarity::{similarity, TokenSet};
use crate::models::HeadlineItem;

/// A non-empty group of headlines believed to report the same story.
///
/// The first member is always the seed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<'a> {
    members: Vec<&'a HeadlineItem>,
}

impl<'a> Cluster<'a> {
    fn seeded(seed: &'a HeadlineItem) -> Self {
        Self { members: vec![seed] }
    }

    pub fn seed(&self) -> &'a HeadlineItem {
        self.members[0]
    }

    pub fn members(&self) -> &[&'a HeadlineItem] {
        &self.members
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }
}

/// Partition `items` into clusters.
///
/// Clusters come back in the order their seeds appear in `items`, and members
/// keep their input order. Any `threshold` is accepted; values at or below
/// zero put everything in one cluster, values above one give singletons.
pub fn cluster(items: &[HeadlineItem], threshold: f64) -> Vec<Cluster<'_>> {
    let tokens: Vec<TokenSet> = items
        .iter()
        .map(|item| TokenSet::from_text(&item.headline))
        .collect();
    let mut assigned = vec![false; items.len()];
    let mut clusters = Vec::new();

    for i in 0..items.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut group = Cluster::seeded(&items[i]);

        for j in (i + 1)..items.len() {
            if assigned[j] {
                continue;
            }
            if similarity(&tokens[i], &tokens[j]) >= threshold {
                assigned[j] = true;
                group.members.push(&items[j]);
            }
        }

        tracing::debug!(seed = %items[i].headline, size = group.len(), "Formed cluster");
        clusters.push(group);
    }

    clusters
}
