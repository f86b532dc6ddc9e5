//! SocialPulse Analyze — the local, deterministic analysis pipeline.
//!
//! Selection, sentiment classification, daily trend, keyword frequency and
//! record assembly. Runs with zero external dependencies so a valid analysis
//! record exists even when the narrative service does not answer.

pub mod compose;
pub mod keywords;
pub mod pipeline;
pub mod select;
pub mod sentiment;
pub mod trend;

pub use compose::{compose_record, NARRATIVE_PLACEHOLDER};
pub use pipeline::{run_local, LocalStats};
pub use select::select_for_analysis;
pub use sentiment::{classify, has_devanagari};
pub use trend::daily_trend;
