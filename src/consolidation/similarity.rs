//! Jaccard similarity over normalized token sets.

use super::normalize::normalize;
use std::collections::BTreeSet;

/// The set of normalized tokens of one headline.
///
/// Duplicated tokens collapse; ordering is only there to keep `Debug` output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    /// Normalize `text` and collect its tokens.
    pub fn from_text(text: &str) -> Self {
        Self(normalize(text).into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Jaccard coefficient `|A ∩ B| / |A ∪ B|`, in `[0, 1]`.
///
/// Two empty sets have an empty union and are defined to have similarity `0.0`.
pub fn similarity(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let intersection = a.0.intersection(&b.0).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> TokenSet {
        words.iter().copied().collect()
    }

    #[test]
    fn test_identical_sets_are_one() {
        let a = set(&["rate", "cut", "march"]);
        assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_disjoint_sets_are_zero() {
        let a = set(&["rate", "cut"]);
        let b = set(&["ethereum", "gains"]);
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_sets_are_zero() {
        let empty = TokenSet::default();
        assert_eq!(similarity(&empty, &empty), 0.0);
        assert_eq!(similarity(&empty, &set(&["rate"])), 0.0);
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let samples = [
            set(&["federal", "reserve", "signals", "rate", "cut", "march"]),
            set(&["fed", "chair", "signals", "rate", "cut", "coming", "march"]),
            set(&["ethereum", "gains", "today"]),
            set(&["rate"]),
            TokenSet::default(),
        ];
        for a in &samples {
            for b in &samples {
                let ab = similarity(a, b);
                assert_eq!(ab, similarity(b, a));
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn test_fed_headlines_overlap() {
        let a = TokenSet::from_text("Federal Reserve signals rate cut in March");
        let b = TokenSet::from_text("Fed Chair signals rate cut coming in March");
        // 4 shared of 9 distinct
        assert!((similarity(&a, &b) - 4.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_tokens_collapse() {
        let a = TokenSet::from_text("crypto crypto crypto rally");
        assert_eq!(a.len(), 2);
        assert_eq!(a, set(&["rally", "crypto"]));
        assert_eq!(similarity(&a, &set(&["crypto", "rally"])), 1.0);
    }
}
