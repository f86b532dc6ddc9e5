//! Local analysis pipeline: one linear scan over the selected documents.
//!
//! Everything here is deterministic and dependency-free; the narrative
//! service only ever adds to what this produces.

use tracing::debug;

use crate::keywords::{keyword_frequency, word_count_stats};
use crate::select::select_for_analysis;
use crate::sentiment::{classify, has_devanagari, truncate_for_analysis};
use crate::trend::daily_trend;
use pulse_core::{Distribution, SamplePost, SocialDocument, TrendBucket, WordCountStats};

/// Sample posts kept per script bucket.
const MAX_SAMPLES_PER_SCRIPT: usize = 3;

/// Characters of a post kept in a sample.
const MAX_SAMPLE_CHARS: usize = 280;

/// Everything the local stages compute for one run.
#[derive(Debug, Clone, Default)]
pub struct LocalStats {
    /// Number of documents actually analyzed (after selection).
    pub selected_count: u64,
    pub distribution: Distribution,
    pub confidence_avg: f64,
    pub trend: Vec<TrendBucket>,
    /// Sorted descending by count, bounded.
    pub keyword_frequency: Vec<(String, u64)>,
    pub word_count_stats: WordCountStats,
    /// Sample posts in Latin script (bucketed as English).
    pub latin_samples: Vec<SamplePost>,
    /// Sample posts in Devanagari script (Hindi/Marathi, not separable locally).
    pub devanagari_samples: Vec<SamplePost>,
}

/// Run the local stages over a document set.
///
/// Selection, classification, trend, keyword and word-count aggregation in a
/// single pass. Total: an empty document set yields a zeroed result.
pub fn run_local(docs: &[SocialDocument]) -> LocalStats {
    let selected = select_for_analysis(docs);
    debug!("analyzing {} of {} documents", selected.len(), docs.len());

    let mut distribution = Distribution::default();
    let mut confidence_sum = 0.0;
    let mut dated = Vec::with_capacity(selected.len());
    let mut latin_samples = Vec::new();
    let mut devanagari_samples = Vec::new();
    let mut truncated_texts = Vec::with_capacity(selected.len());

    for doc in &selected {
        let text = truncate_for_analysis(&doc.text);
        let result = classify(text);

        distribution.add(result.label);
        confidence_sum += result.confidence;
        dated.push((doc.created_at, result.label));

        let bucket = if has_devanagari(text) {
            &mut devanagari_samples
        } else {
            &mut latin_samples
        };
        if bucket.len() < MAX_SAMPLES_PER_SCRIPT {
            bucket.push(SamplePost {
                text: truncate_chars(text, MAX_SAMPLE_CHARS),
                sentiment: result.label.as_str().to_string(),
                confidence: result.confidence,
            });
        }

        truncated_texts.push(text);
    }

    let selected_count = selected.len() as u64;
    let confidence_avg = if selected_count > 0 {
        confidence_sum / selected_count as f64
    } else {
        0.0
    };

    LocalStats {
        selected_count,
        distribution,
        confidence_avg,
        trend: daily_trend(&dated),
        keyword_frequency: keyword_frequency(truncated_texts.iter().copied()),
        word_count_stats: word_count_stats(truncated_texts.iter().copied()),
        latin_samples,
        devanagari_samples,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::SentimentLabel;

    fn doc(post_id: &str, text: &str, created_at: Option<&str>) -> SocialDocument {
        SocialDocument {
            post_id: post_id.into(),
            text: text.into(),
            created_at: created_at.map(|s| s.parse().unwrap()),
            author: None,
        }
    }

    #[test]
    fn test_distribution_matches_selected_count() {
        let docs = vec![
            doc("p1", "great match", Some("2024-01-01T10:00:00Z")),
            doc("p2", "worst game", Some("2024-01-01T11:00:00Z")),
            doc("p3", "the schedule changed", None),
        ];
        let stats = run_local(&docs);
        assert_eq!(stats.selected_count, 3);
        assert_eq!(stats.distribution.total(), 3);
        assert_eq!(stats.distribution.positive, 1);
        assert_eq!(stats.distribution.negative, 1);
        assert_eq!(stats.distribution.neutral, 1);
    }

    #[test]
    fn test_trend_split_across_two_days() {
        // 2024-01-01 positive + negative, 2024-01-02 neutral.
        let docs = vec![
            doc("p1", "great win, best team", Some("2024-01-01T05:00:00Z")),
            doc("p2", "awful performance, worst bowling", Some("2024-01-01T18:00:00Z")),
            doc("p3", "the toss happens at nine", Some("2024-01-02T09:00:00Z")),
        ];
        let stats = run_local(&docs);

        assert_eq!(stats.trend.len(), 2);
        assert_eq!(stats.trend[0].date, "2024-01-01");
        assert_eq!(stats.trend[0].positive, 1);
        assert_eq!(stats.trend[0].neutral, 0);
        assert_eq!(stats.trend[0].negative, 1);
        assert_eq!(stats.trend[0].total, 2);
        assert_eq!(stats.trend[1].date, "2024-01-02");
        assert_eq!(stats.trend[1].neutral, 1);
        assert_eq!(stats.trend[1].total, 1);

        assert_eq!(stats.distribution.positive, 1);
        assert_eq!(stats.distribution.neutral, 1);
        assert_eq!(stats.distribution.negative, 1);
    }

    #[test]
    fn test_undated_doc_in_distribution_but_not_trend() {
        let docs = vec![doc("p1", "great", None)];
        let stats = run_local(&docs);
        assert_eq!(stats.distribution.positive, 1);
        assert!(stats.trend.is_empty());
    }

    #[test]
    fn test_repeated_runs_identical() {
        let docs = vec![
            doc("comment-1", "love this", Some("2024-02-02T01:00:00Z")),
            doc("comment-2", "बकवास खेल", Some("2024-02-03T01:00:00Z")),
            doc("video-1", "ignored because comments exist", None),
        ];
        let a = run_local(&docs);
        let b = run_local(&docs);
        assert_eq!(a.distribution, b.distribution);
        assert_eq!(a.trend, b.trend);
        assert_eq!(a.keyword_frequency, b.keyword_frequency);
    }

    #[test]
    fn test_script_sample_buckets() {
        let docs = vec![
            doc("p1", "nice innings", None),
            doc("p2", "शानदार पारी", None),
        ];
        let stats = run_local(&docs);
        assert_eq!(stats.latin_samples.len(), 1);
        assert_eq!(stats.devanagari_samples.len(), 1);
        assert_eq!(stats.devanagari_samples[0].sentiment, SentimentLabel::Positive.as_str());
    }

    #[test]
    fn test_empty_set_is_zeroed_not_a_crash() {
        let stats = run_local(&[]);
        assert_eq!(stats.selected_count, 0);
        assert_eq!(stats.distribution.total(), 0);
        assert!(stats.trend.is_empty());
        assert!(stats.keyword_frequency.is_empty());
        assert_eq!(stats.confidence_avg, 0.0);
    }
}
