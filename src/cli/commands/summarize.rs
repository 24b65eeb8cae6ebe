//! Summarize command implementation.

use super::speak::save_speech;
use super::transcript::report_language;
use crate::assistant::VideoAssistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::language::Language;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(
    url: &str,
    language: Language,
    speak: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubesum doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = VideoAssistant::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = match assistant.transcript(url, language).await {
        Ok(t) => t,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to get transcript: {}", e));
            return Err(e.into());
        }
    };

    spinner.set_message("Generating notes...");
    let summary = assistant.summarize_text(&transcript.text).await;
    spinner.finish_and_clear();

    let summary = match summary {
        Ok(s) => s,
        Err(e) => {
            Output::error(&format!("Failed to generate summary: {}", e));
            return Err(e.into());
        }
    };

    report_language(&transcript, language);
    Output::header("AI Notes");
    println!("\n{}\n", summary);

    if let Some(path) = speak {
        save_speech(&assistant, &summary, &path, false).await?;
    }

    Ok(())
}
