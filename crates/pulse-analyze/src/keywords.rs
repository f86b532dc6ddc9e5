//! Keyword frequency counting and word-count statistics.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use pulse_core::WordCountStats;

/// Tokens examined per document. Bounds the work a single long document (or
/// injected script block) can contribute to the table.
pub const MAX_TOKENS_PER_DOC: usize = 200;

/// Size bound of the returned frequency table.
pub const MAX_KEYWORDS: usize = 100;

/// Latin letters and Devanagari code points only; numbers and punctuation
/// never become keywords.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Latin}\p{Devanagari}]+").unwrap());

/// Count keyword occurrences across the given texts.
///
/// Lowercased tokens, minimum two characters, at most [`MAX_TOKENS_PER_DOC`]
/// tokens per text. Returns the top [`MAX_KEYWORDS`] entries sorted
/// descending by count; ties keep first-encountered order so repeated runs
/// produce the identical table.
pub fn keyword_frequency<'a, I>(texts: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
    let mut next_rank = 0usize;

    for text in texts {
        let lower = text.to_lowercase();
        for m in TOKEN_RE.find_iter(&lower).take(MAX_TOKENS_PER_DOC) {
            let token = m.as_str();
            if token.chars().count() < 2 {
                continue;
            }
            let entry = counts.entry(token.to_string()).or_insert_with(|| {
                let rank = next_rank;
                next_rank += 1;
                (0, rank)
            });
            entry.0 += 1;
        }
    }

    let mut entries: Vec<(String, u64, usize)> = counts
        .into_iter()
        .map(|(token, (count, rank))| (token, count, rank))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    entries
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, count, _)| (token, count))
        .collect()
}

/// Whitespace word counts over the given texts. All zeros for no input.
pub fn word_count_stats<'a, I>(texts: I) -> WordCountStats
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0u64;
    let mut count = 0u64;
    let mut max = 0u64;
    let mut min = u64::MAX;

    for text in texts {
        let words = text.split_whitespace().count() as u64;
        total += words;
        count += 1;
        max = max.max(words);
        min = min.min(words);
    }

    if count == 0 {
        return WordCountStats::default();
    }

    WordCountStats {
        avg: total as f64 / count as f64,
        max,
        min,
    }
}
