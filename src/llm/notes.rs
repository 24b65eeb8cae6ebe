//! Summaries of and answers about a transcript.

use super::{ChatModel, ChatRequest};
use crate::config::{LlmSettings, Prompts};
use crate::error::{Result, TubesumError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Produces AI notes for a transcript.
pub struct VideoNotes {
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
    settings: LlmSettings,
}

impl VideoNotes {
    pub fn new(chat: Arc<dyn ChatModel>, prompts: Prompts, settings: LlmSettings) -> Self {
        Self {
            chat,
            prompts,
            settings,
        }
    }

    /// Build the summary request for `transcript`.
    pub fn summary_request(&self, transcript: &str) -> ChatRequest {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());

        let user = self
            .prompts
            .render_with_custom(&self.prompts.summary.user, &vars);

        ChatRequest::new(&self.settings.model, user)
            .with_system(self.prompts.summary.system.clone())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
    }

    /// Build the question-answering request.
    pub fn answer_request(&self, transcript: &str, question: &str) -> ChatRequest {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        vars.insert("question".to_string(), question.trim().to_string());

        let user = self.prompts.render_with_custom(&self.prompts.qa.user, &vars);
        let request = ChatRequest::new(&self.settings.model, user);

        if self.prompts.qa.system.trim().is_empty() {
            request
        } else {
            request.with_system(self.prompts.qa.system.clone())
        }
    }

    /// Generate a structured summary.
    #[instrument(skip_all, fields(chars = transcript.len()))]
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(TubesumError::InvalidInput(
                "Cannot summarize an empty transcript".to_string(),
            ));
        }

        info!("Generating summary with {}", self.settings.model);
        self.chat.complete(self.summary_request(transcript)).await
    }

    /// Answer a free-form question about the transcript.
    #[instrument(skip(self, transcript), fields(chars = transcript.len()))]
    pub async fn answer(&self, transcript: &str, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(TubesumError::InvalidInput("Question is empty".to_string()));
        }
        if transcript.trim().is_empty() {
            return Err(TubesumError::InvalidInput(
                "Cannot answer from an empty transcript".to_string(),
            ));
        }

        self.chat
            .complete(self.answer_request(transcript, question))
            .await
    }
}
