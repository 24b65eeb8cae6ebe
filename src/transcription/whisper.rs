//! Whisper transcription over an OpenAI-compatible API.

use super::{AudioTranscript, Transcriber};
use crate::audio::split_audio;
use crate::config::{LlmSettings, TranscriptionSettings};
use crate::error::{Result, TubesumError};
use crate::language::Language;
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
    chunk_duration_seconds: u32,
    max_concurrent_chunks: usize,
}

impl WhisperTranscriber {
    pub fn new(llm: &LlmSettings, settings: &TranscriptionSettings) -> Result<Self> {
        Ok(Self::with_client(create_client(llm)?, settings))
    }

    pub fn with_client(client: Client<OpenAIConfig>, settings: &TranscriptionSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            chunk_duration_seconds: settings.chunk_duration_seconds,
            max_concurrent_chunks: settings.max_concurrent_chunks.max(1),
        }
    }

    /// Transcribe a single audio file (no splitting).
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_single(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<AudioTranscript> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(file_name, file_bytes))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson);

        if let Some(lang) = language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| TubesumError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| TubesumError::Transcription(format!("Whisper API error: {}", e)))?;

        Ok(AudioTranscript {
            text: response.text.trim().to_string(),
            language: Some(normalize_language(&response.language)),
        })
    }
}

/// Map Whisper's language names ("english") to codes where we know them.
fn normalize_language(reported: &str) -> String {
    reported
        .parse::<Language>()
        .map(|l| l.code().to_string())
        .unwrap_or_else(|_| reported.to_lowercase())
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<AudioTranscript> {
        let temp_dir = tempfile::tempdir()?;
        let chunks = split_audio(audio_path, temp_dir.path(), self.chunk_duration_seconds).await?;

        if chunks.len() == 1 {
            return self.transcribe_single(audio_path, language).await;
        }

        let chunk_count = chunks.len();
        info!("Processing {} audio chunks with {}", chunk_count, self.model);

        let pb = ProgressBar::new(chunk_count as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  {spinner:.green} Whisper   [{bar:30.cyan/blue}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }

        let mut results: Vec<(usize, AudioTranscript)> = Vec::with_capacity(chunk_count);

        let mut stream = stream::iter(chunks.into_iter().enumerate())
            .map(|(idx, (chunk_path, offset))| async move {
                let result = self.transcribe_single(&chunk_path, language).await;
                (idx, offset, result)
            })
            .buffer_unordered(self.max_concurrent_chunks);

        while let Some((idx, offset, result)) = stream.next().await {
            pb.inc(1);
            match result {
                Ok(transcript) => results.push((idx, transcript)),
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(TubesumError::Transcription(format!(
                        "Chunk {} at {:.0}s failed: {}",
                        idx, offset, e
                    )));
                }
            }
        }

        pb.finish_and_clear();
        results.sort_by_key(|(idx, _)| *idx);

        let language = results.iter().find_map(|(_, t)| t.language.clone());
        let text = results
            .into_iter()
            .map(|(_, t)| t.text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(AudioTranscript { text, language })
    }
}
