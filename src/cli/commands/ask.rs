//! Ask command implementation.

use super::speak::save_speech;
use crate::assistant::VideoAssistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::language::Language;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    url: &str,
    question: &str,
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

    let spinner = Output::spinner("Thinking...");
    let answer = assistant.ask(url, question, language).await;
    spinner.finish_and_clear();

    match answer {
        Ok(answer) => {
            println!("\n{}\n", answer);
            if let Some(path) = speak {
                save_speech(&assistant, &answer, &path, false).await?;
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            Err(e.into())
        }
    }
}
