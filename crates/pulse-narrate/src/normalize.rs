//! Normalization of extracted service output into [`RemoteNarrative`].
//!
//! Providers drift: newer responses follow the `summary`/`languages` schema
//! the prompt asks for, older models fall back to a flat shape with
//! `sentimentDistribution` and `contentThemes`. Every read here is tolerant;
//! missing or mistyped fields become empty, never errors.

use pulse_core::{Distribution, Engager, KeywordCount, RemoteLanguage, RemoteNarrative, SamplePost, Theme};
use serde_json::Value;

/// Map a recovered JSON object onto the narrative fields the composer reads.
/// Returns `None` only when the value carries nothing usable at all.
pub fn normalize(value: &Value) -> Option<RemoteNarrative> {
    if !value.is_object() {
        return None;
    }

    let mut out = RemoteNarrative {
        narrative: read_narrative(value),
        highlights: read_string_array(&value["summary"]["highlights"])
            .or_else(|| read_string_array(&value["highlights"]))
            .unwrap_or_default(),
        recommendations: read_string_array(&value["summary"]["recommendations"])
            .or_else(|| read_string_array(&value["recommendations"]))
            .unwrap_or_default(),
        top_engagers: read_engagers(&value["topEngagers"]),
        en: read_language(&value["languages"]["en"]),
        hi: read_language(&value["languages"]["hi"]),
        mr: read_language(&value["languages"]["mr"]),
    };

    // Flat legacy shape: no languages object, stats at the top level.
    if value.get("languages").map_or(true, |l| !l.is_object()) {
        out.en = read_legacy_language(value);
    }

    let empty = out.narrative.is_none()
        && out.highlights.is_empty()
        && out.recommendations.is_empty()
        && out.top_engagers.is_empty()
        && is_empty_language(&out.en)
        && is_empty_language(&out.hi)
        && is_empty_language(&out.mr);

    if empty {
        None
    } else {
        Some(out)
    }
}

fn is_empty_language(lang: &RemoteLanguage) -> bool {
    lang.distribution.is_none()
        && lang.confidence_avg.is_none()
        && lang.top_keywords.is_empty()
        && lang.themes.is_empty()
        && lang.sample_posts.is_empty()
}

fn read_narrative(value: &Value) -> Option<String> {
    value["summary"]["narrative"]
        .as_str()
        .or_else(|| value["narrative"].as_str())
        .or_else(|| value["summary"].as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_language(value: &Value) -> RemoteLanguage {
    RemoteLanguage {
        distribution: read_distribution(&value["distribution"]),
        confidence_avg: value["confidenceAvg"].as_f64(),
        top_keywords: read_keywords(&value["topKeywords"]),
        themes: read_themes(&value["themes"]),
        sample_posts: read_samples(&value["samplePosts"]),
    }
}

fn read_legacy_language(value: &Value) -> RemoteLanguage {
    let mut keywords = read_keywords(&value["topPositiveWords"]);
    keywords.extend(read_keywords(&value["topNegativeWords"]));
    RemoteLanguage {
        distribution: read_distribution(&value["sentimentDistribution"]),
        confidence_avg: value["confidenceAvg"].as_f64(),
        top_keywords: keywords,
        themes: read_themes(&value["contentThemes"]),
        sample_posts: read_samples(&value["samplePosts"]),
    }
}

fn read_distribution(value: &Value) -> Option<Distribution> {
    if !value.is_object() {
        return None;
    }
    Some(Distribution {
        positive: read_count(&value["positive"]),
        neutral: read_count(&value["neutral"]),
        negative: read_count(&value["negative"]),
    })
}

// models occasionally emit counts as floats
fn read_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|f| f.max(0.0) as u64))
        .unwrap_or(0)
}

fn read_string_array(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Keyword entries arrive either as `{keyword, count}` objects or bare
/// strings (legacy word lists).
fn read_keywords(value: &Value) -> Vec<KeywordCount> {
    let Some(arr) = value.as_array() else {
        return Vec::new();
    };
    arr.iter()
        .filter_map(|item| {
            if let Some(word) = item.as_str() {
                return Some(KeywordCount {
                    keyword: word.to_string(),
                    count: 1,
                });
            }
            let keyword = item["keyword"].as_str().or_else(|| item["word"].as_str())?;
            Some(KeywordCount {
                keyword: keyword.to_string(),
                count: read_count(&item["count"]),
            })
        })
        .collect()
}

/// Theme entries arrive as `{theme, examples}` objects or bare strings.
fn read_themes(value: &Value) -> Vec<Theme> {
    let Some(arr) = value.as_array() else {
        return Vec::new();
    };
    arr.iter()
        .filter_map(|item| {
            if let Some(label) = item.as_str() {
                return Some(Theme {
                    theme: label.to_string(),
                    examples: Vec::new(),
                });
            }
            let theme = item["theme"].as_str()?;
            Some(Theme {
                theme: theme.to_string(),
                examples: read_string_array(&item["examples"]).unwrap_or_default(),
            })
        })
        .collect()
}

fn read_samples(value: &Value) -> Vec<SamplePost> {
    let Some(arr) = value.as_array() else {
        return Vec::new();
    };
    arr.iter()
        .filter_map(|item| {
            let text = item["text"].as_str()?;
            Some(SamplePost {
                text: text.to_string(),
                sentiment: item["sentiment"].as_str().unwrap_or("neutral").to_string(),
                confidence: item["confidence"].as_f64().unwrap_or(0.5),
            })
        })
        .collect()
}

fn read_engagers(value: &Value) -> Vec<Engager> {
    let Some(arr) = value.as_array() else {
        return Vec::new();
    };
    arr.iter()
        .filter_map(|item| {
            let title = item["channelTitle"]
                .as_str()
                .or_else(|| item["name"].as_str())?;
            Some(Engager {
                channel_title: title.to_string(),
                reason: item["reason"].as_str().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_schema() {
        let value = json!({
            "summary": {
                "narrative": "Mostly upbeat chatter.",
                "highlights": ["fans happy"],
                "recommendations": ["post more clips"]
            },
            "languages": {
                "en": {
                    "distribution": {"positive": 4, "neutral": 1, "negative": 0},
                    "confidenceAvg": 0.82,
                    "topKeywords": [{"keyword": "match", "count": 3}],
                    "themes": [{"theme": "celebration", "examples": ["what a win"]}],
                    "samplePosts": [{"text": "great game", "sentiment": "positive", "confidence": 0.9}]
                },
                "hi": {},
                "mr": {}
            },
            "topEngagers": [{"channelTitle": "CricketFan", "reason": "frequent commenter"}]
        });

        let out = normalize(&value).unwrap();
        assert_eq!(out.narrative.as_deref(), Some("Mostly upbeat chatter."));
        assert_eq!(out.highlights, vec!["fans happy"]);
        assert_eq!(out.top_engagers[0].channel_title, "CricketFan");
        let dist = out.en.distribution.unwrap();
        assert_eq!(dist.positive, 4);
        assert_eq!(out.en.confidence_avg, Some(0.82));
        assert_eq!(out.en.top_keywords[0].keyword, "match");
        assert_eq!(out.en.themes[0].examples, vec!["what a win"]);
        assert!(is_empty_language(&out.hi));
    }

    #[test]
    fn test_legacy_flat_schema() {
        let value = json!({
            "narrative": "Mixed reactions.",
            "sentimentDistribution": {"positive": 2, "neutral": 3, "negative": 5},
            "contentThemes": ["pricing complaints", "delivery delays"],
            "topPositiveWords": ["good"],
            "topNegativeWords": ["late", "broken"]
        });

        let out = normalize(&value).unwrap();
        assert_eq!(out.narrative.as_deref(), Some("Mixed reactions."));
        let dist = out.en.distribution.unwrap();
        assert_eq!(dist.negative, 5);
        assert_eq!(out.en.themes.len(), 2);
        assert_eq!(out.en.themes[0].theme, "pricing complaints");
        let words: Vec<&str> = out.en.top_keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(words, vec!["good", "late", "broken"]);
    }

    #[test]
    fn test_float_counts_tolerated() {
        let value = json!({
            "languages": {"en": {"distribution": {"positive": 3.0, "neutral": 1.9, "negative": 0}}}
        });
        let dist = normalize(&value).unwrap().en.distribution.unwrap();
        assert_eq!(dist.positive, 3);
        assert_eq!(dist.neutral, 1);
    }

    #[test]
    fn test_engager_name_alias() {
        let value = json!({
            "topEngagers": [{"name": "Asha", "reason": "top replies"}]
        });
        let out = normalize(&value).unwrap();
        assert_eq!(out.top_engagers[0].channel_title, "Asha");
    }

    #[test]
    fn test_empty_object_yields_none() {
        assert!(normalize(&json!({})).is_none());
        assert!(normalize(&json!({"languages": {"en": {}, "hi": {}, "mr": {}}})).is_none());
        assert!(normalize(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_mistyped_fields_become_empty() {
        let value = json!({
            "summary": {"narrative": "ok", "highlights": "not an array"},
            "topEngagers": "nope",
            "languages": {"en": {"topKeywords": [42, {"keyword": "x", "count": "y"}]}}
        });
        let out = normalize(&value).unwrap();
        assert!(out.highlights.is_empty());
        assert!(out.top_engagers.is_empty());
        assert_eq!(out.en.top_keywords.len(), 1);
        assert_eq!(out.en.top_keywords[0].count, 0);
    }
}
