//! Transcript acquisition from caption tracks.

use crate::captions::{extract_video_id, CaptionProvider, CaptionTrack, Fragment, TrackList};
use crate::error::{Result, TubesumError};
use crate::language::Language;
use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Where the transcript text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSource {
    /// YouTube caption track.
    Captions,
    /// Speech-to-text over the downloaded audio.
    Speech,
}

/// Plain-text transcript of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub video_id: String,
    /// Never empty.
    pub text: String,
    /// Language code of the track the text was taken from.
    pub original_language: String,
    /// Language code of `text`.
    pub language: String,
    /// True when `text` is a translation of the original track.
    pub translated: bool,
    pub source: TranscriptSource,
    pub fetched_at: DateTime<Utc>,
}

impl TranscriptResult {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// User-facing warning when `requested` could not be honored.
    pub fn fallback_notice(&self, requested: Language) -> Option<String> {
        (self.language != requested.code()).then(|| {
            format!(
                "Could not translate to {}. Using original language ({}).",
                requested.name(),
                self.original_language
            )
        })
    }
}

/// Pick the caption track to use.
///
/// Manually created tracks in `priority` order win over generated ones. When
/// `allow_any` is set, a track in an unlisted language is accepted last.
pub fn select_track<'a>(
    tracks: &'a TrackList,
    priority: &[String],
    allow_any: bool,
) -> Result<&'a CaptionTrack> {
    tracks
        .find_manually_created(priority)
        .or_else(|| tracks.find_generated(priority))
        .or_else(|| allow_any.then(|| tracks.first_available()).flatten())
        .ok_or_else(|| TubesumError::NoTranscript(tracks.video_id.clone()))
}

/// Join fragment texts with single spaces, skipping blank ones.
pub fn join_fragments(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Retrieves caption transcripts, translating when asked.
pub struct TranscriptFetcher {
    provider: Arc<dyn CaptionProvider>,
    retry: RetryPolicy,
    languages: Vec<String>,
    allow_any_language: bool,
}

impl TranscriptFetcher {
    pub fn new(provider: Arc<dyn CaptionProvider>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            retry,
            languages: Language::all_codes(),
            allow_any_language: false,
        }
    }

    /// Override the caption language priority list.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_any_language(mut self, allow: bool) -> Self {
        self.allow_any_language = allow;
        self
    }

    /// Fetch the transcript of `url`, translated into `target` when possible.
    ///
    /// A failed translation is logged and the original language returned.
    #[instrument(skip(self), fields(url = %url, target = %target))]
    pub async fn fetch(&self, url: &str, target: Language) -> Result<TranscriptResult> {
        let video_id = extract_video_id(url)?;

        let tracks = self
            .retry
            .run(|| self.provider.list_tracks(&video_id))
            .await?;

        let track = select_track(&tracks, &self.languages, self.allow_any_language)?;
        info!(
            "Using {} {} track",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" }
        );

        let original_language = track.language_code.clone();

        if original_language != target.code() {
            match self.fetch_translated(track, target).await {
                Ok(text) => {
                    return Ok(TranscriptResult {
                        video_id,
                        text,
                        original_language,
                        language: target.code().to_string(),
                        translated: true,
                        source: TranscriptSource::Captions,
                        fetched_at: Utc::now(),
                    });
                }
                Err(e) => {
                    warn!(
                        "Could not translate to {}. Using original language ({}): {}",
                        target.name(),
                        original_language,
                        e
                    );
                }
            }
        }

        let fragments = self.provider.fetch(track).await?;
        let text = join_fragments(&fragments);

        if text.is_empty() {
            return Err(TubesumError::EmptyTranscript(video_id));
        }

        Ok(TranscriptResult {
            video_id,
            text,
            language: original_language.clone(),
            original_language,
            translated: false,
            source: TranscriptSource::Captions,
            fetched_at: Utc::now(),
        })
    }

    async fn fetch_translated(&self, track: &CaptionTrack, target: Language) -> Result<String> {
        let translated = track.translate(target.code())?;
        let fragments = self.provider.fetch(&translated).await?;
        let text = join_fragments(&fragments);

        if text.is_empty() {
            return Err(TubesumError::Translation(format!(
                "{} translation came back empty",
                target.code()
            )));
        }

        Ok(text)
    }
}
