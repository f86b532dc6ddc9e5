//! Assembly of the final analysis record.
//!
//! The record shape is identical whether or not the narrative service
//! responded: local statistics always fill the counted fields, and the
//! remote result only contributes narrative enrichment. This is what makes
//! the narrative path safely optional.

use crate::pipeline::LocalStats;
use pulse_core::{
    AnalysisRecord, LanguageBreakdown, LanguageBreakdowns, RemoteLanguage, RemoteNarrative,
    SamplePost, Summary,
};

/// Narrative shown when the remote service produced nothing usable.
pub const NARRATIVE_PLACEHOLDER: &str =
    "Narrative analysis unavailable. Statistics below are computed locally.";

/// Build the canonical analysis record from local statistics plus an
/// optional normalized remote narrative.
///
/// Locally computed values win for every counted field so the record
/// invariants hold on every run: the overall distribution equals the sum of
/// per-document labels, the trend comes from the local scan, and the keyword
/// table is bounded and sorted at construction.
pub fn compose_record(local: &LocalStats, remote: Option<RemoteNarrative>) -> AnalysisRecord {
    let remote = remote.unwrap_or_default();

    let summary = Summary {
        overall_distribution: local.distribution,
        overall_confidence_avg: local.confidence_avg,
        narrative: remote
            .narrative
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| NARRATIVE_PLACEHOLDER.to_string()),
        highlights: remote.highlights,
        recommendations: remote.recommendations,
    };

    let languages = LanguageBreakdowns {
        en: language_bucket(local, remote.en, &local.latin_samples),
        hi: language_bucket(local, remote.hi, &local.devanagari_samples),
        mr: language_bucket(local, remote.mr, &local.devanagari_samples),
    };

    let mut keyword_frequency = serde_json::Map::with_capacity(local.keyword_frequency.len());
    for (token, count) in &local.keyword_frequency {
        keyword_frequency.insert(token.clone(), serde_json::Value::from(*count));
    }

    AnalysisRecord {
        summary,
        trend: local.trend.clone(),
        languages,
        top_engagers: remote.top_engagers,
        word_count_stats: local.word_count_stats,
        keyword_frequency,
    }
}

/// One language bucket: remote enrichment where present, local fallback
/// otherwise. Local classification cannot split languages, so the fallback
/// distribution is the overall one and samples come from the script bucket.
fn language_bucket(
    local: &LocalStats,
    remote: RemoteLanguage,
    script_samples: &[SamplePost],
) -> LanguageBreakdown {
    let sample_posts = if remote.sample_posts.is_empty() {
        script_samples.to_vec()
    } else {
        remote.sample_posts
    };

    LanguageBreakdown {
        distribution: remote.distribution.unwrap_or(local.distribution),
        confidence_avg: remote.confidence_avg.unwrap_or(local.confidence_avg),
        top_keywords: remote.top_keywords,
        themes: remote.themes,
        sample_posts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run_local;
    use pulse_core::{Distribution, Engager, KeywordCount, SocialDocument};

    fn docs() -> Vec<SocialDocument> {
        vec![
            SocialDocument {
                post_id: "p1".into(),
                text: "what a great match".into(),
                created_at: Some("2024-01-01T10:00:00Z".parse().unwrap()),
                author: None,
            },
            SocialDocument {
                post_id: "p2".into(),
                text: "खराब खेल".into(),
                created_at: Some("2024-01-02T10:00:00Z".parse().unwrap()),
                author: None,
            },
        ]
    }

    #[test]
    fn test_fallback_record_is_fully_populated() {
        let local = run_local(&docs());
        let record = compose_record(&local, None);

        assert_eq!(record.summary.narrative, NARRATIVE_PLACEHOLDER);
        assert!(record.summary.highlights.is_empty());
        assert!(record.summary.recommendations.is_empty());
        assert!(record.top_engagers.is_empty());
        assert_eq!(record.summary.overall_distribution.total(), 2);

        // All three language keys carry the overall distribution.
        for lang in [&record.languages.en, &record.languages.hi, &record.languages.mr] {
            assert_eq!(lang.distribution, local.distribution);
            assert!(lang.top_keywords.is_empty());
            assert!(lang.themes.is_empty());
        }

        // hi and mr share the Devanagari samples; en gets the Latin ones.
        assert_eq!(record.languages.en.sample_posts.len(), 1);
        assert_eq!(record.languages.hi.sample_posts.len(), 1);
        assert_eq!(
            record.languages.hi.sample_posts[0].text,
            record.languages.mr.sample_posts[0].text
        );
    }

    #[test]
    fn test_remote_enrichment_keeps_local_counts() {
        let local = run_local(&docs());
        let remote = RemoteNarrative {
            narrative: Some("Fans are split on the result.".into()),
            highlights: vec!["big win".into()],
            recommendations: vec!["post more highlights".into()],
            top_engagers: vec![Engager {
                channel_title: "CricketFan".into(),
                reason: "most replies".into(),
            }],
            en: RemoteLanguage {
                // A remote distribution that disagrees with local counts is
                // kept only inside the language bucket it describes.
                distribution: Some(Distribution { positive: 9, neutral: 0, negative: 0 }),
                confidence_avg: Some(0.9),
                top_keywords: vec![KeywordCount { keyword: "match".into(), count: 4 }],
                themes: vec![],
                sample_posts: vec![],
            },
            ..Default::default()
        };

        let record = compose_record(&local, Some(remote));
        assert_eq!(record.summary.narrative, "Fans are split on the result.");
        // The headline distribution is still the locally counted one.
        assert_eq!(record.summary.overall_distribution, local.distribution);
        assert_eq!(record.languages.en.distribution.positive, 9);
        assert_eq!(record.languages.en.top_keywords.len(), 1);
        assert_eq!(record.top_engagers.len(), 1);
        // Remote gave no samples for en, so the local ones remain.
        assert_eq!(record.languages.en.sample_posts.len(), 1);
    }

    #[test]
    fn test_blank_remote_narrative_uses_placeholder() {
        let local = run_local(&docs());
        let remote = RemoteNarrative {
            narrative: Some("   ".into()),
            ..Default::default()
        };
        let record = compose_record(&local, Some(remote));
        assert_eq!(record.summary.narrative, NARRATIVE_PLACEHOLDER);
    }

    #[test]
    fn test_keyword_frequency_sorted_and_bounded() {
        let local = run_local(&docs());
        let record = compose_record(&local, None);
        assert!(record.keyword_frequency.len() <= 100);

        let counts: Vec<u64> = record
            .keyword_frequency
            .values()
            .map(|v| v.as_u64().unwrap())
            .collect();
        let mut sorted = counts.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
    }

    #[test]
    fn test_empty_document_set_degenerate_record() {
        let local = run_local(&[]);
        let record = compose_record(&local, None);
        assert_eq!(record.summary.overall_distribution.total(), 0);
        assert!(record.trend.is_empty());
        assert!(record.keyword_frequency.is_empty());
        assert_eq!(record.word_count_stats.max, 0);
    }
}
