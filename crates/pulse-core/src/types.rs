//! Core data model: social documents, sentiment labels, and the analysis
//! record written back onto every document of a collection.
//!
//! Wire names are camelCase to match the dashboard API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested unit of social content (post, comment, or reply).
///
/// Owned by the ingestion layer; the analysis pipeline reads it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialDocument {
    #[serde(rename = "postId")]
    pub post_id: String,
    pub text: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl SocialDocument {
    /// Reply/comment documents carry a `comment-` id prefix (set by the
    /// ingestion connectors).
    pub fn is_comment(&self) -> bool {
        self.post_id.starts_with("comment-")
    }
}

/// Sentiment label assigned to a single text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document classification output. Aggregated only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: SentimentLabel,
    /// Clamped to [0, 1].
    pub confidence: f64,
}

/// Sentiment counts over a document set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl Distribution {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

/// Per-calendar-day aggregate of sentiment counts (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// `YYYY-MM-DD`; lexicographic order equals chronological order.
    pub date: String,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
}

/// A keyword and how often it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

/// A content theme with short example posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub theme: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A sample post with its assigned sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePost {
    pub text: String,
    pub sentiment: String,
    pub confidence: f64,
}

/// An account surfaced by the narrative service as a top engager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engager {
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    pub reason: String,
}

/// Word counts across the selected documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCountStats {
    pub avg: f64,
    pub max: u64,
    pub min: u64,
}

/// Per-language slice of the analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageBreakdown {
    pub distribution: Distribution,
    #[serde(rename = "confidenceAvg")]
    pub confidence_avg: f64,
    #[serde(rename = "topKeywords", default)]
    pub top_keywords: Vec<KeywordCount>,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(rename = "samplePosts", default)]
    pub sample_posts: Vec<SamplePost>,
}

/// The three language buckets the dashboard renders.
///
/// Local classification only separates Devanagari from Latin script, so `hi`
/// and `mr` are identical unless the narrative service distinguishes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageBreakdowns {
    pub en: LanguageBreakdown,
    pub hi: LanguageBreakdown,
    pub mr: LanguageBreakdown,
}

/// Headline summary of the analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "overallDistribution")]
    pub overall_distribution: Distribution,
    #[serde(rename = "overallConfidenceAvg")]
    pub overall_confidence_avg: f64,
    pub narrative: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// The pipeline's sole output. Built once per run and replaced wholesale;
/// the persistence sink writes it, the dashboard reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub summary: Summary,
    #[serde(default)]
    pub trend: Vec<TrendBucket>,
    pub languages: LanguageBreakdowns,
    #[serde(rename = "topEngagers", default)]
    pub top_engagers: Vec<Engager>,
    #[serde(rename = "wordCountStats")]
    pub word_count_stats: WordCountStats,
    /// Token → count, sorted descending by count at construction time and
    /// bounded to 100 entries.
    #[serde(rename = "keywordFrequency", default)]
    pub keyword_frequency: serde_json::Map<String, serde_json::Value>,
}

/// Narrative-only fields recovered from the remote service, after
/// normalization. Everything here is optional enrichment; the locally
/// computed statistics always take precedence for counts and trends.
#[derive(Debug, Clone, Default)]
pub struct RemoteNarrative {
    pub narrative: Option<String>,
    pub highlights: Vec<String>,
    pub recommendations: Vec<String>,
    pub top_engagers: Vec<Engager>,
    pub en: RemoteLanguage,
    pub hi: RemoteLanguage,
    pub mr: RemoteLanguage,
}

/// Per-language enrichment from the remote service.
#[derive(Debug, Clone, Default)]
pub struct RemoteLanguage {
    pub distribution: Option<Distribution>,
    pub confidence_avg: Option<f64>,
    pub top_keywords: Vec<KeywordCount>,
    pub themes: Vec<Theme>,
    pub sample_posts: Vec<SamplePost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_add_and_total() {
        let mut d = Distribution::default();
        d.add(SentimentLabel::Positive);
        d.add(SentimentLabel::Negative);
        d.add(SentimentLabel::Negative);
        assert_eq!(d.positive, 1);
        assert_eq!(d.negative, 2);
        assert_eq!(d.total(), 3);
    }

    #[test]
    fn test_comment_marker() {
        let doc = SocialDocument {
            post_id: "comment-abc".into(),
            text: "hi".into(),
            created_at: None,
            author: None,
        };
        assert!(doc.is_comment());
    }

    #[test]
    fn test_record_wire_names() {
        let record = AnalysisRecord::default();
        let v = serde_json::to_value(&record).unwrap();
        assert!(v["summary"]["overallDistribution"].is_object());
        assert!(v["summary"]["overallConfidenceAvg"].is_number());
        assert!(v["languages"]["en"]["samplePosts"].is_array());
        assert!(v["topEngagers"].is_array());
        assert!(v["wordCountStats"]["avg"].is_number());
        assert!(v["keywordFrequency"].is_object());
    }
}
