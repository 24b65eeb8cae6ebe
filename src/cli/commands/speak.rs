//! Speak command implementation.

use crate::assistant::VideoAssistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the speak command.
pub async fn run_speak(text: &str, output: &str, html: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let assistant = VideoAssistant::new(settings)?;
    save_speech(&assistant, text, output, html).await
}

/// Synthesize `text` and write it to `path`, as raw audio or an HTML player.
pub(crate) async fn save_speech(
    assistant: &VideoAssistant,
    text: &str,
    path: &str,
    html: bool,
) -> Result<()> {
    let spinner = Output::spinner("Synthesizing speech...");
    let audio = assistant.speak(text).await;
    spinner.finish_and_clear();

    let audio = match audio {
        Ok(a) => a,
        Err(e) => {
            Output::error(&format!("Failed to synthesize speech: {}", e));
            return Err(e.into());
        }
    };

    if html {
        std::fs::write(path, html_page(&audio.to_html_player()))?;
    } else {
        std::fs::write(path, &audio.bytes)?;
    }

    Output::success(&format!(
        "Saved {} audio ({} KB) to {}",
        audio.format,
        audio.bytes.len() / 1024,
        path
    ));
    Ok(())
}

fn html_page(player: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>tubesum</title></head>\n<body>{}</body></html>\n",
        player
    )
}
