//! Configuration module for tubesum.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts, SummaryPrompts};
pub use settings::{
    CacheSettings, CaptionSettings, GeneralSettings, LlmSettings, PromptSettings,
    ServerSettings, Settings, SpeechSettings, TranscriptionSettings,
};
