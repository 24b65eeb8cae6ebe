//! Chat-completion models and the video notes built on them.

mod notes;
mod openai;

pub use notes::VideoNotes;
pub use openai::OpenAiChat;

use crate::error::Result;
use async_trait::async_trait;

/// A single-turn chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system: Option<String>,
    pub user: String,
    /// Provider default when `None`.
    pub temperature: Option<f32>,
    /// Provider default when `None`.
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            user: user.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Trait for chat-completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Return the text of the first completion choice.
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}
