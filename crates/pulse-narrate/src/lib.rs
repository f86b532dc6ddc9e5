//! SocialPulse Narrate — the remote narrative service boundary.
//!
//! Provider configuration, prompt construction, the single-attempt fetch,
//! and recovery of structured output from whatever text comes back. The rest
//! of the pipeline treats this whole crate as optional: every path here fails
//! soft to `None`.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod prompt;
pub mod types;

pub use config::NarrativeConfig;
pub use extract::extract_json;
pub use fetch::{test_api_key, NarrativeFetcher};
pub use normalize::normalize;
pub use prompt::{build_prompt, OUTPUT_SCHEMA};
pub use types::{NarrativeAccess, NarrativeConfigUpdate, NarrativeProvider, TestKeyRequest};
