//! Web search through the Tavily search API.

use crate::config::SearchSettings;
use crate::error::{Result, SvarError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Web search client.
pub struct WebSearch {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
    search_depth: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// A single web search result.
#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

impl WebSearch {
    /// Create a client from settings. The key is resolved now but only checked on use.
    pub fn new(http: reqwest::Client, settings: &SearchSettings) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.resolve_api_key(),
            max_results: settings.max_results,
            search_depth: settings.search_depth.clone(),
        }
    }

    /// Whether an API key was found.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self))]
    async fn request(&self, query: &str, max_results: Option<u32>) -> Result<SearchResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SvarError::Search("no API key configured (set TAVILY_API_KEY)".to_string())
        })?;

        let body = SearchRequest {
            query,
            max_results: max_results.unwrap_or(self.max_results),
            search_depth: &self.search_depth,
        };

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SvarError::Search(format!("HTTP {}: {}", status, text)));
        }

        let parsed: SearchResponse = response.json().await?;
        debug!("Web search returned {} results", parsed.results.len());
        Ok(parsed)
    }

    /// Run a search and format the results for the agent.
    pub async fn search(&self, query: &str, max_results: Option<u32>) -> Result<String> {
        let response = self.request(query, max_results).await?;

        if response.results.is_empty() {
            return Ok(format!("No web results found for '{}'.", query));
        }

        let mut out = String::new();
        if let Some(answer) = response.answer.filter(|a| !a.is_empty()) {
            out.push_str(&format!("Summary: {}\n\n", answer));
        }

        let formatted = response
            .results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}\n   {}\n   {}", i + 1, r.title, r.url, r.content.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push_str(&formatted);

        Ok(out)
    }
}
