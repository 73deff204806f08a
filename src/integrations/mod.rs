//! Clients for the external services the agent can call.
//!
//! Each client takes a shared `reqwest::Client` (or a local binary) and a
//! settings section, and renders its results as plain text for the model.

mod arxiv;
mod python;
mod tavily;
mod wikipedia;

pub use arxiv::{parse_feed, ArxivSearch, Paper};
pub use python::{CodeInterpreter, Execution};
pub use tavily::WebSearch;
pub use wikipedia::Wikipedia;

use crate::error::{Result, SvarError};
use std::time::Duration;

/// Timeout for tool HTTP requests.
const TOOL_HTTP_TIMEOUT_SECS: u64 = 60;

/// Build the HTTP client shared by the tool backends.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(TOOL_HTTP_TIMEOUT_SECS))
        .user_agent(concat!("svar/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SvarError::Config(format!("Failed to create HTTP client: {}", e)))
}
