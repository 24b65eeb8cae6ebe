//! Transcript command implementation.

use crate::assistant::VideoAssistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::language::Language;
use crate::transcript::{TranscriptResult, TranscriptSource};
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(
    url: &str,
    language: Language,
    audio_fallback: bool,
    output: Option<String>,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    settings.captions.audio_fallback |= audio_fallback;
    let operation = if settings.captions.audio_fallback {
        Operation::Listen
    } else {
        Operation::Generate
    };

    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubesum doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = VideoAssistant::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let result = assistant.transcript(url, language).await;
    spinner.finish_and_clear();

    let transcript = match result {
        Ok(t) => t,
        Err(e) => {
            Output::error(&format!("Failed to get transcript: {}", e));
            return Err(e.into());
        }
    };

    report_language(&transcript, language);

    let rendered = if json {
        serde_json::to_string_pretty(&transcript)?
    } else {
        transcript.text.clone()
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            Output::success(&format!(
                "Saved {} words to {}",
                transcript.word_count(),
                path
            ));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Tell the user when the transcript is not in the requested language.
pub(crate) fn report_language(transcript: &TranscriptResult, requested: Language) {
    if transcript.source == TranscriptSource::Speech {
        Output::info("No captions found; transcript was produced by speech-to-text.");
    }

    if let Some(notice) = transcript.fallback_notice(requested) {
        Output::warning(&notice);
    } else if transcript.translated {
        Output::info(&format!(
            "Translated from {} to {}.",
            transcript.original_language,
            requested.name()
        ));
    }
}
