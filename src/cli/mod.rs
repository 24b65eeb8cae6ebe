//! CLI module for tubesum.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::language::Language;
use clap::{Parser, Subcommand};

/// tubesum - YouTube video summaries
///
/// Fetches a video's captions, summarizes them with an LLM, answers questions
/// about them, and reads the results aloud.
#[derive(Parser, Debug)]
#[command(name = "tubesum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,

    /// Print a video's transcript
    Transcript {
        /// YouTube URL (youtube.com/watch?v=... or youtu.be/...)
        url: String,

        /// Target language (en, hi, mr, es, fr, de, ja, ko, ru)
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// Transcribe the audio track if the video has no captions
        #[arg(long)]
        audio_fallback: bool,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Output as JSON including language metadata
        #[arg(long)]
        json: bool,
    },

    /// Generate structured notes for a video
    Summarize {
        /// YouTube URL
        url: String,

        /// Transcript language to summarize from
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// Also save a spoken version of the summary to this file
        #[arg(long)]
        speak: Option<String>,
    },

    /// Ask a question about a video
    Ask {
        /// YouTube URL
        url: String,

        /// The question to ask
        question: String,

        /// Transcript language to answer from
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// Also save a spoken version of the answer to this file
        #[arg(long)]
        speak: Option<String>,
    },

    /// Convert text to speech
    Speak {
        /// Text to read aloud
        text: String,

        /// Output audio file
        #[arg(short, long, default_value = "speech.wav")]
        output: String,

        /// Write an HTML page with an embedded player instead of raw audio
        #[arg(long)]
        html: bool,
    },

    /// Transcribe a video's audio track with speech-to-text
    Listen {
        /// YouTube URL
        url: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start the web interface
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

/// Log filter for the `-v` count, falling back to the configured level.
pub fn log_filter(verbose: u8, configured: &str) -> String {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("tubesum={}", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_uses_configured_level_without_flags() {
        assert_eq!(log_filter(0, "error"), "tubesum=error");
        assert_eq!(log_filter(1, "error"), "tubesum=info");
        assert_eq!(log_filter(2, "error"), "tubesum=debug");
        assert_eq!(log_filter(5, "error"), "tubesum=trace");
    }

    #[test]
    fn test_parse_summarize_with_language() {
        let cli = Cli::try_parse_from([
            "tubesum",
            "summarize",
            "https://youtu.be/abc",
            "--language",
            "hi",
        ])
        .unwrap();

        match cli.command {
            Commands::Summarize { url, language, speak } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert_eq!(language, Language::Hi);
                assert!(speak.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_language_is_rejected() {
        let result = Cli::try_parse_from(["tubesum", "transcript", "https://youtu.be/abc", "-l", "pt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["tubesum", "doctor", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
