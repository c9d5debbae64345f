use async_trait::async_trait;
use bima_core::{AdapterError, SpeechAudio, SpeechSynthesizer};
use serde_json::json;
use tracing::debug;

const API_BASE: &str = "https://api.elevenlabs.io/v1";
const MODEL_ID: &str = "eleven_multilingual_v2";

/// ElevenLabs text-to-speech over its REST API.
pub struct ElevenLabsSpeech {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsSpeech {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSpeech {
    async fn synthesize(&self, text: &str, voice_id: &str) -> bima_core::Result<SpeechAudio> {
        let url = format!("{}/text-to-speech/{}", self.base_url, voice_id);
        debug!(voice_id, chars = text.chars().count(), "Requesting speech synthesis");

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&json!({
                "text": text,
                "model_id": MODEL_ID,
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75
                }
            }))
            .send()
            .await
            .map_err(|e| AdapterError::Speech(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Speech(format!("{status}: {body}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdapterError::Speech(e.to_string()))?;
        Ok(SpeechAudio::mpeg(bytes.to_vec()))
    }
}
