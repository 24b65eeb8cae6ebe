//! YouTube caption tracks.
//!
//! A video exposes zero or more caption tracks, each either authored by the
//! uploader or generated by speech recognition. Translatable tracks can be
//! re-requested in another language.

mod timedtext;
mod youtube;

pub use timedtext::{decode_entities, parse_timedtext};
pub use youtube::YoutubeCaptions;

use crate::error::{Result, TubesumError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A language a caption track can be translated into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    pub language_code: String,
    pub language: String,
}

/// One caption track of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,
    /// Human-readable language name as reported by YouTube.
    pub language: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    pub base_url: String,
    #[serde(default)]
    pub translation_languages: Vec<TranslationLanguage>,
    /// Source language code when this track is a machine translation.
    #[serde(default)]
    pub translated_from: Option<String>,
}

impl CaptionTrack {
    /// Derive a track that serves this one translated into `target`.
    pub fn translate(&self, target: &str) -> Result<CaptionTrack> {
        if !self.is_translatable {
            return Err(TubesumError::Translation(format!(
                "{} track is not translatable",
                self.language_code
            )));
        }

        let language = self
            .translation_languages
            .iter()
            .find(|t| t.language_code == target)
            .ok_or_else(|| {
                TubesumError::Translation(format!(
                    "{} is not offered for the {} track",
                    target, self.language_code
                ))
            })?;

        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| TubesumError::Translation(format!("Bad caption URL: {}", e)))?;
        url.query_pairs_mut().append_pair("tlang", target);

        Ok(CaptionTrack {
            language_code: language.language_code.clone(),
            language: language.language.clone(),
            is_generated: true,
            is_translatable: false,
            base_url: url.into(),
            translation_languages: Vec::new(),
            translated_from: Some(self.language_code.clone()),
        })
    }
}

/// Caption tracks available for a video, in provider order.
#[derive(Debug, Clone, Default)]
pub struct TrackList {
    pub video_id: String,
    pub manually_created: Vec<CaptionTrack>,
    pub generated: Vec<CaptionTrack>,
}

impl TrackList {
    /// First manually created track matching `codes`, honoring their order.
    pub fn find_manually_created(&self, codes: &[String]) -> Option<&CaptionTrack> {
        find_in(&self.manually_created, codes)
    }

    /// First generated track matching `codes`, honoring their order.
    pub fn find_generated(&self, codes: &[String]) -> Option<&CaptionTrack> {
        find_in(&self.generated, codes)
    }

    /// Any track at all, manual ones first.
    pub fn first_available(&self) -> Option<&CaptionTrack> {
        self.manually_created.first().or_else(|| self.generated.first())
    }

    pub fn is_empty(&self) -> bool {
        self.manually_created.is_empty() && self.generated.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaptionTrack> {
        self.manually_created.iter().chain(self.generated.iter())
    }
}

fn find_in<'a>(tracks: &'a [CaptionTrack], codes: &[String]) -> Option<&'a CaptionTrack> {
    codes
        .iter()
        .find_map(|code| tracks.iter().find(|t| &t.language_code == code))
}

/// One timed unit of caption text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Source of caption tracks.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// List the caption tracks of a video.
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList>;

    /// Download the fragments of a track.
    async fn fetch(&self, track: &CaptionTrack) -> Result<Vec<Fragment>>;
}

/// Extract the video id from a `youtube.com/watch?v=` or `youtu.be/` URL.
pub fn extract_video_id(url: &str) -> Result<String> {
    let url = url.trim();

    let raw = if url.contains("youtu.be/") {
        url.split_once("youtu.be/")
            .map(|(_, rest)| rest.split('?').next().unwrap_or_default())
    } else if url.contains("youtube.com") {
        url.split_once("v=")
            .map(|(_, rest)| rest.split('&').next().unwrap_or_default())
    } else {
        None
    };

    let id = raw
        .map(|s| s.split(['/', '#']).next().unwrap_or_default().trim())
        .unwrap_or_default();

    if id.is_empty() {
        return Err(TubesumError::InvalidUrl(url.to_string()));
    }

    Ok(id.to_string())
}
