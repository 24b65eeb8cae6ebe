use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tubesum::audio::AudioDownloader;
use tubesum::transcription::{AudioTranscript, Transcriber};
use tubesum::Result;

/// Writes an empty WAV file instead of downloading.
#[derive(Clone, Default)]
pub struct MockDownloader {
    pub calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AudioDownloader for MockDownloader {
    async fn download(&self, url: &str, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
        self.calls.lock().unwrap().push(url.to_string());
        let path = output_dir.join(format!("{}.wav", video_id));
        std::fs::write(&path, b"")?;
        Ok(path)
    }
}

#[derive(Clone)]
pub struct MockTranscriber {
    pub text: String,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockTranscriber {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio_path: &Path, _language: Option<&str>) -> Result<AudioTranscript> {
        self.calls.lock().unwrap().push(audio_path.to_path_buf());
        Ok(AudioTranscript {
            text: self.text.clone(),
            language: Some("en".to_string()),
        })
    }
}
