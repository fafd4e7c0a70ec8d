//! Speech synthesizer client.
//!
//! Sends reply text to a third-party voice synthesis service and returns a
//! playable audio reference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Client that turns text plus a voice identifier into a playable audio URL.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<String, ChatError>;
}

/// Request body for the synthesis endpoint.
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    #[serde(rename = "voiceId")]
    voice_id: &'a str,
    format: &'a str,
}

/// Response body from the synthesis endpoint.
#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    #[serde(rename = "audioUrl")]
    audio_url: String,
}

/// Production [`SpeechSynthesizer`] for a bearer-authenticated HTTP API.
pub struct SpeechApiClient {
    endpoint: String,
    api_key: String,
    format: String,
    client: reqwest::Client,
}

impl SpeechApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        format: impl Into<String>,
    ) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            format: format.into(),
            client,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechApiClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<String, ChatError> {
        let body = SynthesisRequest {
            text,
            voice_id,
            format: &self.format,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::SynthesisFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::SynthesisFailed(format!(
                "service returned {}",
                status
            )));
        }

        let parsed: SynthesisResponse = response
            .json()
            .await
            .map_err(|e| ChatError::SynthesisFailed(format!("unexpected response body: {}", e)))?;

        tracing::debug!(voice_id, "speech synthesized");
        Ok(parsed.audio_url)
    }
}
