use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Average reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum number of key phrases reported
pub const MAX_KEY_PHRASES: usize = 10;

// Letters, numbers and underscore; combining marks split tokens
static WORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid word regex"));

/// Quantitative metrics derived from a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Number of whitespace-delimited tokens
    pub word_count: usize,

    /// Minutes needed to read the transcript, rounded up
    pub reading_time_minutes: usize,

    /// Most frequent tokens, most frequent first
    pub key_phrases: Vec<String>,
}

/// Compute word count, reading time and key phrases for a transcript.
///
/// Total over any input: empty text yields zero words, zero minutes and no phrases.
pub fn calculate_metrics(text: &str) -> AnalyticsResult {
    let word_count = word_count(text);

    AnalyticsResult {
        word_count,
        reading_time_minutes: reading_time_minutes(word_count),
        key_phrases: extract_key_phrases(text),
    }
}

/// Count whitespace-delimited tokens, punctuation included
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Ceiling of `word_count / WORDS_PER_MINUTE`; zero words reads in zero minutes
pub fn reading_time_minutes(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE)
}

/// Rank lowercase word tokens by frequency.
///
/// Ties keep the order in which each token first appeared. Stop words are not filtered.
pub fn extract_key_phrases(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    // Insertion-ordered counts: `index` maps a token to its slot in `counts`
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for token in WORD_TOKEN.find_iter(&lowered).map(|m| m.as_str()) {
        match index.get(token) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(MAX_KEY_PHRASES)
        .map(|(token, _)| token.to_string())
        .collect()
}
