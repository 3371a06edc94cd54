//! Ordering and truncation of scored stories.

use crate::models::ScoredItem;

/// Sort by score, highest first, and keep at most `max_items`.
///
/// The sort is stable, so equal scores keep their incoming order. A
/// `max_items` of zero means no output was requested.
pub fn rank(mut items: Vec<ScoredItem>, max_items: usize) -> Vec<ScoredItem> {
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
    items.truncate(max_items);
    items
}
