//! Speech synthesis through the OpenAI-compatible `audio/speech` endpoint.
//!
//! The request is sent directly with reqwest so that provider-specific voice
//! names (e.g. PlayAI voices on Groq) pass through unchanged.

use super::{truncate_chars, SpeechAudio, SpeechSynthesizer};
use crate::config::{LlmSettings, SpeechSettings};
use crate::error::{Result, TubesumError};
use crate::openai::http_client;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

/// Text-to-speech client.
pub struct OpenAiSpeech {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    settings: SpeechSettings,
}

impl OpenAiSpeech {
    pub fn new(llm: &LlmSettings, settings: SpeechSettings) -> Result<Self> {
        Ok(Self {
            client: http_client(llm.timeout())?,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            api_key: llm.api_key()?,
            settings,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    #[instrument(skip_all, fields(voice = %self.settings.voice, chars = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TubesumError::InvalidInput("Nothing to speak".to_string()));
        }

        let input = truncate_chars(text, self.settings.max_input_chars);
        if input.len() < text.len() {
            warn!(
                "Speech input truncated to {} characters",
                self.settings.max_input_chars
            );
        }

        let body = SpeechRequest {
            model: &self.settings.model,
            voice: &self.settings.voice,
            input,
            response_format: &self.settings.format,
        };

        let resp = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Speech request failed"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TubesumError::Speech { status, message });
        }

        let bytes = resp.bytes().await?.to_vec();
        debug!("Received {} bytes of audio", bytes.len());

        Ok(SpeechAudio::new(bytes, self.settings.format.clone()))
    }
}
