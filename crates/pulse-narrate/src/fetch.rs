//! Remote narrative fetch.
//!
//! One request, no retries. Any failure (transport, non-2xx, missing text in
//! the response body) is logged and yields `None` so the caller falls back to
//! locally computed statistics.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::types::{NarrativeAccess, NarrativeProvider};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the configured narrative provider.
pub struct NarrativeFetcher {
    client: Client,
    access: NarrativeAccess,
}

impl NarrativeFetcher {
    pub fn new(access: NarrativeAccess) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client, access }
    }

    pub fn is_enabled(&self) -> bool {
        self.access.is_enabled()
    }

    /// Send the prompt and return the raw response text, or `None` on any
    /// failure. Never errors out of the analysis pipeline.
    pub async fn fetch(&self, prompt: &str) -> Option<String> {
        let (provider, model, api_key) = match &self.access {
            NarrativeAccess::Enabled {
                provider,
                model,
                api_key,
            } => (*provider, model.as_str(), api_key.as_str()),
            NarrativeAccess::Disabled => return None,
        };

        debug!("Requesting narrative from {} ({})", provider, model);

        let result = match provider {
            NarrativeProvider::Gemini => self.fetch_gemini(model, api_key, prompt).await,
            NarrativeProvider::OpenAI => {
                self.fetch_openai_compat(
                    "https://api.openai.com/v1/chat/completions",
                    model,
                    api_key,
                    prompt,
                )
                .await
            }
            NarrativeProvider::Groq => {
                self.fetch_openai_compat(
                    "https://api.groq.com/openai/v1/chat/completions",
                    model,
                    api_key,
                    prompt,
                )
                .await
            }
        };

        match result {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Narrative fetch failed, continuing with local stats: {}", e);
                None
            }
        }
    }

    async fn fetch_gemini(&self, model: &str, api_key: &str, prompt: &str) -> Result<String, String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, api_key
        );
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, truncate(&body, 300)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("response decode failed: {}", e))?;

        parsed["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "no text in response".to_string())
    }

    async fn fetch_openai_compat(
        &self,
        url: &str,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, String> {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, truncate(&body, 300)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("response decode failed: {}", e))?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "no text in response".to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Probe an API key with a minimal request.
pub async fn test_api_key(provider: &str, api_key: &str) -> Result<(), String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default();

    match provider {
        "gemini" => {
            let resp = client
                .get(format!(
                    "https://generativelanguage.googleapis.com/v1beta/models?key={}",
                    api_key
                ))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        "openai" => {
            let resp = client
                .get("https://api.openai.com/v1/models")
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        "groq" => {
            let resp = client
                .get("https://api.groq.com/openai/v1/models")
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
