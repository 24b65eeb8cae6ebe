//! Listen command: speech-to-text over a video's audio track.

use crate::assistant::VideoAssistant;
use crate::cli::output::preview;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the listen command.
pub async fn run_listen(url: &str, output: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Listen, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubesum doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = VideoAssistant::new(settings)?;

    Output::info("Downloading and transcribing audio...");
    let transcript = match assistant.transcribe_audio(url).await {
        Ok(t) => t,
        Err(e) => {
            Output::error(&format!("Failed to transcribe audio: {}", e));
            return Err(e.into());
        }
    };

    Output::kv("Detected language", &transcript.language);
    Output::kv("Words", &transcript.word_count().to_string());

    match output {
        Some(path) => {
            std::fs::write(&path, &transcript.text)?;
            Output::success(&format!("Saved transcript to {}", path));
            Output::kv("Preview", &preview(&transcript.text, 120));
        }
        None => println!("\n{}\n", transcript.text),
    }

    Ok(())
}
