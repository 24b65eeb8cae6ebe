//! Text-to-speech playback of generated text.

mod openai;

pub use openai::OpenAiSpeech;

use crate::error::Result;
use async_trait::async_trait;
use base64::Engine;

/// Synthesized audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    /// Container name, e.g. `wav` or `mp3`.
    pub format: String,
}

impl SpeechAudio {
    pub fn new(bytes: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            bytes,
            format: format.into(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self.format.as_str() {
            "mp3" => "audio/mpeg",
            "flac" => "audio/flac",
            "ogg" | "opus" => "audio/ogg",
            "aac" => "audio/aac",
            _ => "audio/wav",
        }
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }

    /// An HTML `<audio>` element that plays this clip inline.
    pub fn to_html_player(&self) -> String {
        format!(r#"<audio controls src="{}"></audio>"#, self.data_uri())
    }
}

/// Trait for text-to-speech backends.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio>;
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
