//! Per-source headline cleanup and filtering.
//!
//! Runs before consolidation so the engine only ever sees plain-text
//! headlines that passed the configured length and keyword rules.

use crate::config::FilterConfig;
use crate::models::HeadlineItem;
use html_escape::decode_html_entities;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening, closing or self-closing tags. A bare `<` followed by a space or
/// digit is left alone.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").unwrap());

/// Strip leftover tags, decode entities and collapse whitespace.
///
/// Tags go first so an escaped `&lt;b&gt;` in the text survives as literal
/// characters instead of being removed.
pub fn clean_headline(raw: &str) -> String {
    let without_tags = TAG.replace_all(raw, " ");
    decode_html_entities(&without_tags).split_whitespace().join(" ")
}

/// Check one cleaned headline against the length and keyword rules.
pub fn accepts(headline: &str, config: &FilterConfig) -> bool {
    let len = headline.chars().count();
    if len < config.min_length || len > config.max_length {
        return false;
    }

    let lowered = headline.to_lowercase();
    if config
        .exclude
        .iter()
        .any(|needle| lowered.contains(&needle.to_lowercase()))
    {
        return false;
    }

    config.require_keywords.is_empty()
        || config
            .require_keywords
            .iter()
            .any(|kw| lowered.contains(&kw.to_lowercase()))
}

/// Clean, filter, dedupe and cap one source's headlines, keeping their order.
pub fn apply(items: Vec<HeadlineItem>, config: &FilterConfig) -> Vec<HeadlineItem> {
    items
        .into_iter()
        .map(|mut item| {
            item.headline = clean_headline(&item.headline);
            item
        })
        .filter(|item| accepts(&item.headline, config))
        .unique_by(|item| item.headline.clone())
        .take(config.max_per_source)
        .collect()
}
