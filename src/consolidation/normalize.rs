//! Headline normalization.
//!
//! Reduces a headline to the word tokens that carry topical signal: lowercase,
//! punctuation stripped, short tokens and English function words dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Anything that is neither a word character nor whitespace.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Tokens this short never count, stop word or not.
const MIN_TOKEN_CHARS: usize = 3;

/// English function words excluded from comparison.
pub const STOP_WORDS: &[&str] = &[
    // articles
    "a", "an", "the",
    // auxiliaries
    "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "having",
    "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must",
    // prepositions
    "in", "on", "at", "to", "of", "for", "by", "with", "from", "into", "onto", "upon", "about",
    "above", "below", "over", "under", "after", "before", "between", "through", "during",
    "against", "among", "amid", "off", "out", "via", "per", "up", "down",
    // conjunctions
    "and", "or", "but", "nor", "yet", "so", "as", "if", "than", "then", "because", "while",
    "though", "although",
    // demonstratives and pronouns
    "this", "that", "these", "those", "it", "its", "they", "them", "their", "there", "here",
    "he", "she", "his", "her", "we", "our", "you", "your",
    // question words and fillers
    "what", "which", "who", "whom", "whose", "when", "where", "why", "how", "not", "no", "all",
    "any", "some", "more", "most", "just", "also", "very",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Check whether a lowercase token is a stop word.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

/// Normalize a headline into comparable tokens.
///
/// Tokens come back in the order they appear in the text; duplicates are kept
/// since callers treat the result as a set. Empty or punctuation-only input
/// yields an empty vector.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize("Federal Reserve signals rate cut in March"),
///     vec!["federal", "reserve", "signals", "rate", "cut", "march"]
/// );
/// ```
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");

    stripped
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}
