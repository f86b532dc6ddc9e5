//! Narrative provider types matching the dashboard API surface.

use serde::{Deserialize, Serialize};

/// Generative-text provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeProvider {
    Gemini,
    OpenAI,
    Groq,
}

impl std::fmt::Display for NarrativeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NarrativeProvider::Gemini => write!(f, "gemini"),
            NarrativeProvider::OpenAI => write!(f, "openai"),
            NarrativeProvider::Groq => write!(f, "groq"),
        }
    }
}

/// Typed access state for the narrative service. `Disabled` is an explicit
/// configuration, not an absent environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeAccess {
    Disabled,
    Enabled {
        provider: NarrativeProvider,
        model: String,
        api_key: String,
    },
}

impl NarrativeAccess {
    pub fn is_enabled(&self) -> bool {
        matches!(self, NarrativeAccess::Enabled { .. })
    }
}

/// Narrative config response (keys masked).
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeConfigResponse {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: String,
    #[serde(rename = "geminiConfigured")]
    pub gemini_configured: bool,
    #[serde(rename = "openaiConfigured")]
    pub openai_configured: bool,
    #[serde(rename = "groqConfigured")]
    pub groq_configured: bool,
    #[serde(rename = "geminiModel")]
    pub gemini_model: String,
    #[serde(rename = "openaiModel")]
    pub openai_model: String,
    #[serde(rename = "groqModel")]
    pub groq_model: String,
    #[serde(rename = "activeProvider")]
    pub active_provider: Option<String>,
}

/// Narrative config update request.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeConfigUpdate {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: Option<String>,
    #[serde(rename = "geminiApiKey")]
    pub gemini_api_key: Option<String>,
    #[serde(rename = "openaiApiKey")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "groqApiKey")]
    pub groq_api_key: Option<String>,
    #[serde(rename = "geminiModel")]
    pub gemini_model: Option<String>,
    #[serde(rename = "openaiModel")]
    pub openai_model: Option<String>,
    #[serde(rename = "groqModel")]
    pub groq_model: Option<String>,
}

/// API key test request.
#[derive(Debug, Clone, Deserialize)]
pub struct TestKeyRequest {
    pub provider: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}
