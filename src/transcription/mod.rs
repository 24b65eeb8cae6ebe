//! Speech-to-text for videos without captions.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text recognized from an audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTranscript {
    pub text: String,
    /// Detected language code, when the model reports one.
    pub language: Option<String>,
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file, optionally hinting its language.
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>)
        -> Result<AudioTranscript>;
}
