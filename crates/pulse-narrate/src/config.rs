//! Narrative provider configuration persistence and selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{NarrativeAccess, NarrativeConfigResponse, NarrativeConfigUpdate, NarrativeProvider};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Stored narrative configuration (persisted to narrative-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            gemini_api_key: None,
            openai_api_key: None,
            groq_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            config_path: PathBuf::new(),
        }
    }
}

impl NarrativeConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: NarrativeConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        // Env vars as fallback for API keys
        if config.gemini_api_key.is_none() {
            config.gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = std::env::var("GROQ_API_KEY").ok();
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved narrative config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config.
    pub fn apply_update(&mut self, update: &NarrativeConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.clone();
        }
        if let Some(k) = &update.gemini_api_key {
            self.gemini_api_key = Some(k.clone());
        }
        if let Some(k) = &update.openai_api_key {
            self.openai_api_key = Some(k.clone());
        }
        if let Some(k) = &update.groq_api_key {
            self.groq_api_key = Some(k.clone());
        }
        if let Some(m) = &update.gemini_model {
            self.gemini_model = m.clone();
        }
        if let Some(m) = &update.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(m) = &update.groq_model {
            self.groq_model = m.clone();
        }
    }

    /// Resolve the typed access state. `preferred_provider = "disabled"`
    /// turns the narrative path off even when keys are configured.
    pub fn resolve_access(&self) -> NarrativeAccess {
        if self.preferred_provider == "disabled" {
            return NarrativeAccess::Disabled;
        }

        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "gemini" => self.access_for(NarrativeProvider::Gemini),
                "openai" => self.access_for(NarrativeProvider::OpenAI),
                "groq" => self.access_for(NarrativeProvider::Groq),
                _ => NarrativeAccess::Disabled,
            };
        }

        // Auto mode: Gemini > Groq > OpenAI
        for provider in [
            NarrativeProvider::Gemini,
            NarrativeProvider::Groq,
            NarrativeProvider::OpenAI,
        ] {
            let access = self.access_for(provider);
            if access.is_enabled() {
                return access;
            }
        }

        NarrativeAccess::Disabled
    }

    fn access_for(&self, provider: NarrativeProvider) -> NarrativeAccess {
        let (key, model) = match provider {
            NarrativeProvider::Gemini => (&self.gemini_api_key, &self.gemini_model),
            NarrativeProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            NarrativeProvider::Groq => (&self.groq_api_key, &self.groq_model),
        };
        match key {
            Some(k) if !k.is_empty() => NarrativeAccess::Enabled {
                provider,
                model: model.clone(),
                api_key: k.clone(),
            },
            _ => NarrativeAccess::Disabled,
        }
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> NarrativeConfigResponse {
        let active = match self.resolve_access() {
            NarrativeAccess::Enabled { provider, .. } => Some(provider.to_string()),
            NarrativeAccess::Disabled => None,
        };
        NarrativeConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            gemini_configured: self.gemini_api_key.is_some(),
            openai_configured: self.openai_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            gemini_model: self.gemini_model.clone(),
            openai_model: self.openai_model.clone(),
            groq_model: self.groq_model.clone(),
            active_provider: active,
        }
    }
}
