//! Chat completions over an OpenAI-compatible API.

use super::{ChatModel, ChatRequest};
use crate::config::LlmSettings;
use crate::error::{Result, TubesumError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by `async-openai`.
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
}

impl OpenAiChat {
    pub fn new(llm: &LlmSettings) -> Result<Self> {
        Ok(Self::with_client(create_client(llm)?))
    }

    pub fn with_client(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| TubesumError::Llm(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user)
                .build()
                .map_err(|e| TubesumError::Llm(e.to_string()))?
                .into(),
        );

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&request.model).messages(messages);
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }

        let api_request = builder
            .build()
            .map_err(|e| TubesumError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(|e| TubesumError::Llm(format!("Chat completion failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|c| !c.trim().is_empty())
            .cloned()
            .ok_or_else(|| TubesumError::Llm("Empty response from LLM".to_string()))?;

        debug!("Completion returned {} characters", content.len());
        Ok(content)
    }
}
