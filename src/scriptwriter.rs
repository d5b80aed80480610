//! Meditation script generation via an OpenAI-compatible chat API.
//!
//! One fixed prompt template, one completion per request. Faults
//! propagate to the caller; there are no retries and no fallback script.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::config::OpenAiConfig;

const MEDITATION_PROMPT: &str = "Guide me through a calming 3-minute meditation for someone feeling {mood}. Use peaceful and reassuring language.";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("text service returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("text service response missing message content")]
    MalformedResponse,
}

pub struct ScriptWriter {
    model: String,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl ScriptWriter {
    pub fn new(config: &OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    /// Request one meditation script for the given mood. The returned
    /// transcript is whatever the model produced, verbatim.
    pub async fn write_script(&self, mood: &str) -> Result<String, ScriptError> {
        let t_start = Instant::now();
        let prompt = MEDITATION_PROMPT.replace("{mood}", mood);

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("Text service returned status {status}: {body}");
            return Err(ScriptError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value = resp.json().await?;
        let transcript = data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(ScriptError::MalformedResponse)?;

        let latency_ms = t_start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Generated {}-char script for mood \"{mood}\" ({latency_ms:.0}ms)",
            transcript.len()
        );
        Ok(transcript)
    }
}
