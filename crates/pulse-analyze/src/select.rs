//! Document selection — prefers reply/comment documents when present.

use pulse_core::SocialDocument;

/// Pick the subset of documents to analyze.
///
/// Audience reaction lives in the comments; when a collection contains any
/// comment documents, top-level posts are dropped from the analysis.
/// Otherwise the full set is used. Never errors; empty in, empty out.
pub fn select_for_analysis(docs: &[SocialDocument]) -> Vec<&SocialDocument> {
    let comments: Vec<&SocialDocument> = docs.iter().filter(|d| d.is_comment()).collect();
    if comments.is_empty() {
        docs.iter().collect()
    } else {
        comments
    }
}
