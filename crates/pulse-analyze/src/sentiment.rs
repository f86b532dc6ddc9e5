//! Lexicon-based sentiment classification, routed by script.
//!
//! Deterministic by construction: identical text always yields the identical
//! label and confidence, which makes re-runs idempotent and the aggregate
//! invariants testable. Texts containing Devanagari code points go through
//! the Hindi/Marathi lexicon; everything else through the English one.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use pulse_core::{ClassificationResult, SentimentLabel};

/// Classification reads at most this many characters of a text.
pub const MAX_CLASSIFY_CHARS: usize = 5000;

static EN_POSITIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "love", "loved", "excellent", "amazing", "awesome", "happy",
        "best", "fantastic", "wonderful", "brilliant", "win", "winning", "won",
        "beautiful", "thanks", "thank", "superb", "nice", "enjoy", "enjoyed",
        "perfect", "outstanding", "impressive", "favorite", "favourite", "proud",
        "congratulations", "excited", "glad", "super", "legend", "epic",
    ]
    .into_iter()
    .collect()
});

static EN_NEGATIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "worst", "hate", "hated", "terrible", "awful", "horrible", "sad",
        "angry", "poor", "disappointing", "disappointed", "boring", "waste",
        "fail", "failed", "failure", "wrong", "shame", "shameful", "pathetic",
        "useless", "stupid", "annoying", "trash", "flop", "scam", "fraud",
        "disgusting", "cringe", "overrated", "lost", "losing",
    ]
    .into_iter()
    .collect()
});

static HI_POSITIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Hindi and Marathi share script; both vocabularies live in one set.
        "अच्छा", "अच्छी", "बढ़िया", "शानदार", "सुंदर", "महान", "खुश", "प्यार",
        "जबरदस्त", "मस्त", "धन्यवाद", "उत्तम", "कमाल", "बेहतरीन", "आनंद",
        "छान", "सुरेख", "भारी", "जिंकला", "अभिमान",
    ]
    .into_iter()
    .collect()
});

static HI_NEGATIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "बुरा", "बुरी", "खराब", "बकवास", "घटिया", "नफरत", "दुख", "गलत",
        "निराश", "भ्रष्ट", "झूठ", "शर्म", "बेकार", "धोखा",
        "वाईट", "खोटे", "हरला", "लाज",
    ]
    .into_iter()
    .collect()
});

/// True if the text contains any Devanagari code point (U+0900–U+097F).
pub fn has_devanagari(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

/// Truncate to a bounded number of characters on a char boundary.
pub fn truncate_for_analysis(text: &str) -> &str {
    match text.char_indices().nth(MAX_CLASSIFY_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Classify a single text. Confidence is clamped to [0, 1].
pub fn classify(text: &str) -> ClassificationResult {
    let text = truncate_for_analysis(text);
    let (positive, negative) = if has_devanagari(text) {
        (&*HI_POSITIVE, &*HI_NEGATIVE)
    } else {
        (&*EN_POSITIVE, &*EN_NEGATIVE)
    };

    let lower = text.to_lowercase();
    let mut pos_hits = 0usize;
    let mut neg_hits = 0usize;
    for word in lower.split(|c: char| c.is_whitespace() || ",.;:!?()[]{}\"'/\\|#@".contains(c)) {
        let word = word.trim();
        if word.len() < 2 {
            continue;
        }
        if positive.contains(word) {
            pos_hits += 1;
        } else if negative.contains(word) {
            neg_hits += 1;
        }
    }

    let total = pos_hits + neg_hits;
    if total == 0 || pos_hits == neg_hits {
        return ClassificationResult {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
        };
    }

    let label = if pos_hits > neg_hits {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    };
    let margin = (pos_hits as f64 - neg_hits as f64).abs() / total as f64;
    let confidence = (0.5 + 0.45 * margin).clamp(0.0, 1.0);

    ClassificationResult { label, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_english() {
        let r = classify("What a great match, best performance ever!");
        assert_eq!(r.label, SentimentLabel::Positive);
        assert!(r.confidence > 0.5 && r.confidence <= 1.0);
    }

    #[test]
    fn test_negative_english() {
        let r = classify("worst game, total waste of time");
        assert_eq!(r.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_when_no_lexicon_hits() {
        let r = classify("the match starts at seven tomorrow");
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.confidence, 0.5);
    }

    #[test]
    fn test_devanagari_routing() {
        assert!(has_devanagari("यह मैच शानदार था"));
        let r = classify("यह मैच शानदार था");
        assert_eq!(r.label, SentimentLabel::Positive);

        let r = classify("बहुत खराब खेल");
        assert_eq!(r.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_deterministic() {
        let text = "great great bad";
        let a = classify(text);
        let b = classify(text);
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncation_is_char_boundary_safe() {
        let text = "शानदार ".repeat(2000);
        let truncated = truncate_for_analysis(&text);
        assert!(truncated.chars().count() <= MAX_CLASSIFY_CHARS);
        // Must not panic on multi-byte boundaries.
        let _ = classify(&text);
    }

    #[test]
    fn test_confidence_clamped() {
        let r = classify(&"great ".repeat(500));
        assert!(r.confidence <= 1.0);
        assert!(r.confidence >= 0.0);
    }
}
