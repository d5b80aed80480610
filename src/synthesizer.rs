//! Speech synthesis via an ElevenLabs-compatible text-to-speech API.
//!
//! Sends the transcript with fixed voice settings and returns the raw
//! audio bytes. Anything but a success status is a failure.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::config::ElevenLabsConfig;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("voice request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success answer from the voice service. The upstream status and
    /// body are logged; callers only ever see the fixed message.
    #[error("Voice generation failed")]
    UpstreamStatus { status: u16 },
}

pub struct VoiceSynthesizer {
    base_url: String,
    voice_id: String,
    stability: f64,
    similarity_boost: f64,
    api_key: Option<String>,
    client: Client,
}

impl VoiceSynthesizer {
    pub fn new(config: &ElevenLabsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            voice_id: config.voice_id.clone(),
            stability: config.stability,
            similarity_boost: config.similarity_boost,
            api_key: config.api_key.clone(),
            client,
        }
    }

    /// Convert the transcript to speech. Returns raw audio bytes.
    pub async fn synthesize(&self, transcript: &str) -> Result<Vec<u8>, SynthesisError> {
        let t_start = Instant::now();

        let body = json!({
            "text": transcript,
            "voice_settings": {
                "stability": self.stability,
                "similarity_boost": self.similarity_boost,
            }
        });

        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("xi-api-key", key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            error!("Voice service returned status {status}: {detail}");
            return Err(SynthesisError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let audio = resp.bytes().await?.to_vec();
        let latency_ms = t_start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Synthesized {} bytes of audio ({latency_ms:.0}ms)",
            audio.len()
        );
        Ok(audio)
    }
}
