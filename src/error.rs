//! Error types for tubesum.

use thiserror::Error;

/// Library-level error type for tubesum operations.
#[derive(Error, Debug)]
pub enum TubesumError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("No transcript available in a supported language for video {0}")]
    NoTranscript(String),

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Empty transcript for video {0}")]
    EmptyTranscript(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("YouTube is blocking requests from this IP: {0}")]
    RequestBlocked(String),

    #[error("Caption retrieval failed: {0}")]
    Captions(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Speech synthesis failed ({status}): {message}")]
    Speech { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TubesumError {
    /// True when the video simply has no usable captions, as opposed to a
    /// network or provider failure.
    pub fn is_caption_unavailable(&self) -> bool {
        matches!(
            self,
            TubesumError::NoTranscript(_)
                | TubesumError::TranscriptsDisabled(_)
                | TubesumError::EmptyTranscript(_)
        )
    }
}

/// Result type alias for tubesum operations.
pub type Result<T> = std::result::Result<T, TubesumError>;
