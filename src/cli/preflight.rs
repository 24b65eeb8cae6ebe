//! Pre-flight checks before network-heavy operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, TubesumError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Captions, summaries, answers and speech need the API key.
    Generate,
    /// Audio transcription needs the API key and media tools.
    Listen,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Generate => {
            settings.llm.api_key()?;
        }
        Operation::Listen => {
            settings.llm.api_key()?;
            check_tool("yt-dlp")?;
            check_tool("ffmpeg")?;
            check_tool("ffprobe")?;
        }
    }
    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TubesumError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TubesumError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TubesumError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_requires_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key_env = "TUBESUM_PREFLIGHT_UNSET_KEY".to_string();
        assert!(matches!(
            check(Operation::Generate, &settings),
            Err(TubesumError::Config(_))
        ));
    }

    #[test]
    fn test_missing_tool() {
        assert!(matches!(
            check_tool("tubesum-definitely-missing"),
            Err(TubesumError::ToolNotFound(_))
        ));
    }
}
