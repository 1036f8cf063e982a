//! Spoken cues through the Gemini text-to-speech API.

use super::{AudioPayload, SpeechCueProvider};
use crate::config::SpeechConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{error, warn};

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Gemini TTS answers with 24 kHz mono PCM.
const SAMPLE_RATE: u32 = 24_000;
const CHANNELS: u16 = 1;

/// A [`SpeechCueProvider`] backed by Gemini's `generateContent` endpoint.
pub struct GeminiSpeech {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    voice: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

impl GeminiSpeech {
    /// Builds a client. A missing API key is not an error here; every request
    /// then yields `None`.
    pub fn from_config(config: &SpeechConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            warn!(
                "{} is not set. Spoken cues will be skipped.",
                config.api_key_env
            );
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            voice: config.voice.clone(),
        })
    }

    async fn request(&self, api_key: &str, text: &str) -> anyhow::Result<AudioPayload> {
        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": self.voice } }
                }
            }
        });
        let url = format!("{ENDPOINT}/{}:generateContent", self.model);
        let response: GenerateResponse = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let data = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.inline_data)
            .map(|d| d.data)
            .ok_or_else(|| anyhow::anyhow!("response carried no audio"))?;

        AudioPayload::from_base64_pcm(&data, SAMPLE_RATE, CHANNELS)
    }
}

#[async_trait]
impl SpeechCueProvider for GeminiSpeech {
    async fn synthesize(&self, text: &str) -> Option<AudioPayload> {
        let api_key = self.api_key.as_deref()?;
        match self.request(api_key, text).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!("Speech generation failed: {e:#}");
                None
            }
        }
    }
}
