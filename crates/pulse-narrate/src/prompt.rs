//! Prompt construction for the narrative service.
//!
//! The schema text sent to the service is the same contract the extractor's
//! normalizer reads back; both live in this crate so they cannot drift apart.

use pulse_core::SocialDocument;

/// Documents serialized into a single prompt. Local statistics still cover
/// the full collection; this only bounds the remote payload.
pub const MAX_PROMPT_DOCS: usize = 200;

/// Characters of a document's text included in the prompt.
const MAX_PROMPT_DOC_CHARS: usize = 500;

/// The output contract requested from the narrative service.
pub const OUTPUT_SCHEMA: &str = r#"{
  "summary": {
    "overallDistribution": {"positive": number, "neutral": number, "negative": number},
    "overallConfidenceAvg": number,
    "narrative": string,
    "highlights": Array<string>,
    "recommendations": Array<string>
  },
  "languages": {
    "en": {
      "distribution": {"positive": number, "neutral": number, "negative": number},
      "confidenceAvg": number,
      "topKeywords": Array<{"keyword": string, "count": number}>,
      "themes": Array<{"theme": string, "examples": Array<string>}>,
      "samplePosts": Array<{"text": string, "sentiment": "positive"|"neutral"|"negative", "confidence": number}>
    },
    "hi": { same shape as "en" },
    "mr": { same shape as "en" }
  },
  "topEngagers": Array<{"channelTitle": string, "reason": string}>,
  "wordCountStats": {"avg": number, "max": number, "min": number},
  "keywordFrequency": {"<keyword>": number}
}"#;

/// Build the full prompt for a collection.
///
/// Deterministic for a given keyword and document sequence.
pub fn build_prompt(keyword: &str, docs: &[SocialDocument]) -> String {
    let mut data_lines = String::new();
    for doc in docs.iter().take(MAX_PROMPT_DOCS) {
        let bounded = SocialDocument {
            post_id: doc.post_id.clone(),
            text: truncate_chars(&doc.text, MAX_PROMPT_DOC_CHARS),
            created_at: doc.created_at,
            author: doc.author.clone(),
        };
        if let Ok(line) = serde_json::to_string(&bounded) {
            data_lines.push_str(&line);
            data_lines.push('\n');
        }
    }

    format!(
        "You are a multilingual social media analyst. Analyze the following posts about \"{keyword}\". \
The text may include English (en), Hindi (hi), and Marathi (mr). Detect the language per post and \
perform sentiment analysis accordingly.\n\n\
Return ONLY valid minified JSON matching this schema exactly:\n{schema}\n\n\
Guidance:\n\
Perform language detection using cues in text; map to keys: en, hi, mr.\n\
Classify sentiment as positive, neutral, or negative. Provide a confidence 0..1.\n\
For topKeywords, stem and aggregate within each language; include Devanagari tokens for hi/mr.\n\
themes should be concise labels with 1-2 short example posts each (in original language).\n\
Keep arrays short (<=10 items). Numbers must be numbers. Strings must not contain newlines.\n\
IMPORTANT: Output ONLY JSON without any extra commentary. No code fences.\n\n\
Data to analyze (newline-separated JSON objects):\n\n{data}",
        keyword = keyword,
        schema = OUTPUT_SCHEMA,
        data = data_lines,
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
