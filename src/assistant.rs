//! Application service tying transcripts, notes and speech together.
//!
//! Transcripts are cached per `(url, language)` and summaries per transcript
//! text, each for the configured TTL.

use crate::audio::{AudioDownloader, YtDlpDownloader};
use crate::cache::TtlCache;
use crate::captions::{extract_video_id, CaptionProvider, YoutubeCaptions};
use crate::config::{Prompts, Settings};
use crate::error::{Result, TubesumError};
use crate::language::Language;
use crate::llm::{ChatModel, OpenAiChat, VideoNotes};
use crate::speech::{OpenAiSpeech, SpeechAudio, SpeechSynthesizer};
use crate::transcript::{TranscriptFetcher, TranscriptResult, TranscriptSource};
use crate::transcription::{Transcriber, WhisperTranscriber};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// External collaborators of a [`VideoAssistant`].
pub struct Components {
    pub captions: Arc<dyn CaptionProvider>,
    pub chat: Arc<dyn ChatModel>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub downloader: Arc<dyn AudioDownloader>,
    pub transcriber: Arc<dyn Transcriber>,
}

/// Summaries, answers and speech for YouTube videos.
pub struct VideoAssistant {
    settings: Settings,
    fetcher: TranscriptFetcher,
    notes: VideoNotes,
    speech: Arc<dyn SpeechSynthesizer>,
    downloader: Arc<dyn AudioDownloader>,
    transcriber: Arc<dyn Transcriber>,
    transcripts: TtlCache<(String, Language), TranscriptResult>,
    summaries: TtlCache<String, String>,
}

impl VideoAssistant {
    /// Create an assistant backed by YouTube and the configured API.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let components = Components {
            captions: Arc::new(YoutubeCaptions::new()?),
            chat: Arc::new(OpenAiChat::new(&settings.llm)?),
            speech: Arc::new(OpenAiSpeech::new(&settings.llm, settings.speech.clone())?),
            downloader: Arc::new(YtDlpDownloader),
            transcriber: Arc::new(WhisperTranscriber::new(
                &settings.llm,
                &settings.transcription,
            )?),
        };

        Ok(Self::with_components(settings, prompts, components))
    }

    /// Create an assistant with custom components.
    pub fn with_components(settings: Settings, prompts: Prompts, components: Components) -> Self {
        let fetcher = TranscriptFetcher::new(components.captions, settings.captions.retry_policy())
            .with_languages(settings.captions.languages.clone())
            .with_any_language(settings.captions.allow_any_language);

        let notes = VideoNotes::new(components.chat, prompts, settings.llm.clone());

        Self {
            transcripts: TtlCache::new(settings.cache.transcript_ttl()),
            summaries: TtlCache::new(settings.cache.summary_ttl()),
            fetcher,
            notes,
            speech: components.speech,
            downloader: components.downloader,
            transcriber: components.transcriber,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Transcript of `url` in `language`, served from cache when fresh.
    #[instrument(skip(self), fields(url = %url, language = %language))]
    pub async fn transcript(&self, url: &str, language: Language) -> Result<TranscriptResult> {
        let url = url.trim();
        // Reject bad URLs before touching the cache.
        extract_video_id(url)?;

        self.transcripts
            .get_or_try_insert_with((url.to_string(), language), || {
                self.acquire_transcript(url, language)
            })
            .await
    }

    async fn acquire_transcript(&self, url: &str, language: Language) -> Result<TranscriptResult> {
        match self.fetcher.fetch(url, language).await {
            Err(e) if e.is_caption_unavailable() && self.settings.captions.audio_fallback => {
                warn!("{}. Falling back to audio transcription", e);
                self.transcribe_audio(url).await
            }
            other => other,
        }
    }

    /// Download the audio of `url` and run speech-to-text over it.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn transcribe_audio(&self, url: &str) -> Result<TranscriptResult> {
        let video_id = extract_video_id(url)?;

        let temp_root = self.settings.temp_dir();
        std::fs::create_dir_all(&temp_root)?;
        let job_dir = tempfile::Builder::new()
            .prefix("job-")
            .tempdir_in(&temp_root)?;

        let audio_path = self
            .downloader
            .download(url, &video_id, job_dir.path())
            .await?;
        info!("Audio ready at {}", audio_path.display());

        let recognized = self.transcriber.transcribe(&audio_path, None).await?;
        let text = recognized.text.trim().to_string();

        if text.is_empty() {
            return Err(TubesumError::EmptyTranscript(video_id));
        }

        let language = recognized
            .language
            .unwrap_or_else(|| Language::default().code().to_string());

        Ok(TranscriptResult {
            video_id,
            text,
            original_language: language.clone(),
            language,
            translated: false,
            source: TranscriptSource::Speech,
            fetched_at: Utc::now(),
        })
    }

    /// Structured summary of the video at `url`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn summarize(&self, url: &str, language: Language) -> Result<String> {
        let transcript = self.transcript(url, language).await?;
        self.summarize_text(&transcript.text).await
    }

    /// Structured summary of an arbitrary transcript, cached by its text.
    pub async fn summarize_text(&self, transcript: &str) -> Result<String> {
        self.summaries
            .get_or_try_insert_with(transcript.to_string(), || self.notes.summarize(transcript))
            .await
    }

    /// Answer `question` from the transcript of `url`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn ask(&self, url: &str, question: &str, language: Language) -> Result<String> {
        if question.trim().is_empty() {
            return Err(TubesumError::InvalidInput("Question is empty".to_string()));
        }

        let transcript = self.transcript(url, language).await?;
        self.notes.answer(&transcript.text, question).await
    }

    /// Synthesize speech for any text output.
    pub async fn speak(&self, text: &str) -> Result<SpeechAudio> {
        self.speech.synthesize(text).await
    }

    /// Drop expired cache entries.
    pub fn purge_caches(&self) -> usize {
        self.transcripts.purge_expired() + self.summaries.purge_expired()
    }
}
