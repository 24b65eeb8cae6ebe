use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tubesum::speech::{SpeechAudio, SpeechSynthesizer};
use tubesum::{Result, TubesumError};

#[derive(Clone, Default)]
pub struct MockSpeech {
    pub calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        self.calls.lock().unwrap().push(text.to_string());
        if text.is_empty() {
            return Err(TubesumError::InvalidInput("Nothing to speak".to_string()));
        }
        Ok(SpeechAudio::new(b"RIFF".to_vec(), "wav"))
    }
}
