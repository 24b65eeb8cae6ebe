//! Client construction for OpenAI-compatible APIs (Groq by default).

use crate::config::LlmSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured endpoint, reading the API key from
/// the environment.
pub fn create_client(llm: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let api_key = llm.api_key()?;
    create_client_with_key(&llm.base_url, &api_key, llm.timeout())
}

/// Create a client with an explicit base URL, key and timeout.
pub fn create_client_with_key(
    base_url: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = http_client(timeout)?;

    let config = OpenAIConfig::new()
        .with_api_base(base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Plain HTTP client with the request timeout applied.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
