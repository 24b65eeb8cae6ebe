//! tubesum - YouTube video summaries
//!
//! A CLI tool and small web app that turns a YouTube video into notes you can
//! read, question and listen to.
//!
//! # Overview
//!
//! tubesum allows you to:
//! - Fetch a video's captions, translated into one of nine languages
//! - Generate structured notes from the transcript with an LLM
//! - Ask questions answered from the transcript
//! - Convert any text output to speech
//! - Transcribe the audio track when a video has no captions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `captions` - YouTube caption track discovery and download
//! - `transcript` - Track selection, translation and fallback
//! - `llm` - Chat completion and the notes/Q&A prompts built on it
//! - `speech` - Text-to-speech
//! - `audio` - Audio download and processing
//! - `transcription` - Speech-to-text for videos without captions
//! - `cache` - Time-limited memoization
//! - `assistant` - The service tying it all together
//!
//! # Example
//!
//! ```rust,no_run
//! use tubesum::assistant::VideoAssistant;
//! use tubesum::config::Settings;
//! use tubesum::language::Language;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let assistant = VideoAssistant::new(settings)?;
//!
//!     let notes = assistant
//!         .summarize("https://youtu.be/dQw4w9WgXcQ", Language::En)
//!         .await?;
//!     println!("{}", notes);
//!
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod audio;
pub mod cache;
pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod llm;
pub mod openai;
pub mod retry;
pub mod speech;
pub mod transcript;
pub mod transcription;

pub use error::{Result, TubesumError};
