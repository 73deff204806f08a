//! Encyclopedia lookup through the MediaWiki API.

use crate::config::WikipediaSettings;
use crate::error::{Result, SvarError};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Wikipedia client.
pub struct Wikipedia {
    http: reqwest::Client,
    endpoint: String,
    max_chars: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
}

impl Wikipedia {
    pub fn new(http: reqwest::Client, settings: &WikipediaSettings) -> Self {
        Self {
            http,
            endpoint: settings.endpoint(),
            max_chars: settings.max_chars,
        }
    }

    /// Titles of pages matching a query, best first.
    #[instrument(skip(self))]
    pub async fn search_titles(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SvarError::Wikipedia(format!("HTTP {}", status)));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .query
            .map(|q| q.search.into_iter().map(|e| e.title).collect())
            .unwrap_or_default())
    }

    /// Plain-text content of a page, following redirects.
    #[instrument(skip(self))]
    pub async fn page(&self, title: &str) -> Result<String> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SvarError::Wikipedia(format!("HTTP {}", status)));
        }

        let parsed: ExtractResponse = response.json().await?;
        let page = parsed
            .query
            .and_then(|q| q.pages.into_iter().next())
            .filter(|p| !p.missing)
            .ok_or_else(|| SvarError::Wikipedia(format!("No page titled '{}'", title)))?;

        let text = page.extract.unwrap_or_default();
        debug!("Loaded Wikipedia page '{}' ({} chars)", page.title, text.len());
        Ok(format!("# {}\n\n{}", page.title, truncate_chars(&text, self.max_chars)))
    }

    /// Search and load the best matching page.
    pub async fn search(&self, query: &str) -> Result<String> {
        let titles = self.search_titles(query, 1).await?;
        match titles.first() {
            Some(title) => self.page(title).await,
            None => Ok(format!("No Wikipedia pages found for '{}'.", query)),
        }
    }
}

/// Truncate to at most `max` characters, marking the cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}\n[... truncated]", &text[..idx]),
        None => text.to_string(),
    }
}
