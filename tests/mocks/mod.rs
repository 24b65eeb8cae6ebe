#![allow(dead_code)]

pub mod audio;
pub mod captions;
pub mod chat;
pub mod speech;

use audio::{MockDownloader, MockTranscriber};
use captions::MockCaptions;
use chat::MockChat;
use speech::MockSpeech;
use std::path::Path;
use std::sync::Arc;
use tubesum::assistant::{Components, VideoAssistant};
use tubesum::config::{Prompts, Settings};

/// Settings with temp files under `temp_dir` and a short retry delay.
pub fn test_settings(temp_dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.general.temp_dir = temp_dir.display().to_string();
    settings.captions.retry_delay_ms = 10;
    settings
}

pub struct Harness {
    pub captions: MockCaptions,
    pub chat: MockChat,
    pub speech: MockSpeech,
    pub downloader: MockDownloader,
    pub transcriber: MockTranscriber,
}

impl Harness {
    pub fn new(captions: MockCaptions, chat: MockChat) -> Self {
        Self {
            captions,
            chat,
            speech: MockSpeech::default(),
            downloader: MockDownloader::default(),
            transcriber: MockTranscriber::new("spoken words from the audio"),
        }
    }

    pub fn assistant(&self, settings: Settings) -> VideoAssistant {
        VideoAssistant::with_components(
            settings,
            Prompts::default(),
            Components {
                captions: Arc::new(self.captions.clone()),
                chat: Arc::new(self.chat.clone()),
                speech: Arc::new(self.speech.clone()),
                downloader: Arc::new(self.downloader.clone()),
                transcriber: Arc::new(self.transcriber.clone()),
            },
        )
    }
}
