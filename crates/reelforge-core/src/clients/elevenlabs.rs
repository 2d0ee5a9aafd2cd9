//! ElevenLabs-style text-to-speech client.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tracing::{error, info, warn};

use crate::clients::SpeechSynthesizer;
use crate::error::PipelineError;

/// Payloads under this size are almost certainly not a valid MP3;
/// logged as a warning but not treated as fatal.
const MIN_PLAUSIBLE_AUDIO_BYTES: usize = 1024;

/// Configuration for the speech service.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// API base, default `https://api.elevenlabs.io`.
    pub api_url: String,
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: "https://api.elevenlabs.io".to_owned(),
            api_key: api_key.into(),
            voice_id: "cgSgspJ2msm6clMCkdW9".to_owned(),
            model_id: "eleven_monolingual_v1".to_owned(),
        }
    }
}

/// Speech synthesizer backed by the ElevenLabs text-to-speech endpoint.
pub struct ElevenLabsSpeech {
    http: reqwest::Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsSpeech {
    pub fn new(http: reqwest::Client, config: ElevenLabsConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSpeech {
    async fn synthesize(&self, text: &str) -> Result<Bytes, PipelineError> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.config.api_url, self.config.voice_id
        );
        let body = json!({
            "text": text,
            "model_id": self.config.model_id,
            "voice_settings": { "stability": 0.5, "similarity_boost": 0.5 },
        });

        let resp = self
            .http
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PipelineError::from_transport("speech service", e, PipelineError::SpeechSynthesis)
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            error!(%status, body = %detail, "speech service returned non-success");
            return Err(PipelineError::SpeechSynthesis(format!(
                "speech service returned {status}"
            )));
        }

        let audio = resp.bytes().await.map_err(|e| {
            PipelineError::SpeechSynthesis(format!("failed to read audio payload: {e}"))
        })?;

        if audio.is_empty() {
            return Err(PipelineError::SpeechSynthesis(
                "speech service returned an empty payload".to_owned(),
            ));
        }
        if audio.len() < MIN_PLAUSIBLE_AUDIO_BYTES {
            warn!(
                bytes = audio.len(),
                "audio payload is suspiciously small; may not be a valid MP3"
            );
        }

        info!(bytes = audio.len(), "speech synthesized");
        Ok(audio)
    }
}
