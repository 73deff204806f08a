//! Client construction for the hosted, OpenAI-compatible inference endpoint.

use crate::config::LlmSettings;
use crate::error::{Result, SvarError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for completion requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the configured endpoint.
///
/// The API key is read from the environment variable named in the settings.
/// A missing key is passed through as an empty string; the endpoint rejects it.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let api_key = std::env::var(&settings.api_key_env).unwrap_or_default();
    let timeout = match settings.timeout_secs {
        0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        secs => Duration::from_secs(secs),
    };
    create_client_with(&settings.api_base, &api_key, timeout)
}

/// Create a client for an explicit base URL and key.
pub fn create_client_with(
    api_base: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SvarError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base)
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
