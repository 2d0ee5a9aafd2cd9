//! Cohere-style script generation client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::clients::ScriptGenerator;
use crate::error::PipelineError;

/// Configuration for the script service.
#[derive(Debug, Clone)]
pub struct CohereConfig {
    /// API base, default `https://api.cohere.ai`.
    pub api_url: String,
    pub api_key: String,
    /// Generation model name.
    pub model: String,
}

impl CohereConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: "https://api.cohere.ai".to_owned(),
            api_key: api_key.into(),
            model: "command".to_owned(),
        }
    }
}

/// Script generator backed by the Cohere `generate` endpoint.
pub struct CohereScript {
    http: reqwest::Client,
    config: CohereConfig,
}

impl CohereScript {
    pub fn new(http: reqwest::Client, config: CohereConfig) -> Self {
        Self { http, config }
    }

    fn prompt_for(subject: &str) -> String {
        format!(
            "Write a short, engaging, and inspiring 60-second video script about \
             the sports history and achievements of {subject}. Make it suitable \
             for a TikTok-style reel."
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ScriptGenerator for CohereScript {
    async fn generate_script(&self, subject: &str) -> Result<String, PipelineError> {
        let url = format!("{}/v1/generate", self.config.api_url);
        let body = json!({
            "model": self.config.model,
            "prompt": Self::prompt_for(subject),
            "max_tokens": 300,
            "temperature": 0.8,
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PipelineError::from_transport("script service", e, PipelineError::ScriptGeneration)
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            error!(%status, body = %detail, "script service returned non-success");
            return Err(PipelineError::ScriptGeneration(format!(
                "script service returned {status}"
            )));
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            PipelineError::ScriptGeneration(format!("invalid script service response: {e}"))
        })?;

        let script = parsed
            .generations
            .first()
            .map(|g| g.text.trim().to_owned())
            .unwrap_or_default();

        // Empty text is a failure, not a valid reel.
        if script.is_empty() {
            return Err(PipelineError::ScriptGeneration(
                "script service returned empty text".to_owned(),
            ));
        }

        debug!(subject, chars = script.len(), "script generated");
        Ok(script)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
