//! Academic paper search through the arXiv Atom API.

use crate::config::ArxivSettings;
use crate::error::{Result, SvarError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// A paper entry from the arXiv feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published: String,
}

/// arXiv search client.
pub struct ArxivSearch {
    http: reqwest::Client,
    base_url: String,
    max_results: u32,
}

impl ArxivSearch {
    pub fn new(http: reqwest::Client, settings: &ArxivSettings) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_results: settings.max_results,
        }
    }

    /// Query arXiv by relevance.
    #[instrument(skip(self))]
    pub async fn papers(&self, query: &str) -> Result<Vec<Paper>> {
        let max_results = self.max_results.to_string();
        let search_query = format!("all:{}", query);

        let response = self
            .http
            .get(format!("{}/api/query", self.base_url))
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SvarError::Arxiv(format!("HTTP {}", status)));
        }

        let feed = response.text().await?;
        let papers = parse_feed(&feed);
        debug!("arXiv returned {} papers", papers.len());
        Ok(papers)
    }

    /// Query arXiv and format the papers for the agent.
    pub async fn search(&self, query: &str) -> Result<String> {
        let papers = self.papers(query).await?;
        if papers.is_empty() {
            return Ok(format!("No arXiv papers found for '{}'.", query));
        }

        Ok(papers
            .iter()
            .map(|p| {
                format!(
                    "{}\nPublished: {}\nURL: {}\n{}",
                    p.title, p.published, p.url, p.summary
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("valid regex"))
}

/// Entry fields read from the feed, in `Paper` order.
const FIELDS: [&str; 4] = ["title", "summary", "id", "published"];

fn field_res() -> &'static [Regex; 4] {
    static RES: OnceLock<[Regex; 4]> = OnceLock::new();
    RES.get_or_init(|| {
        FIELDS.map(|tag| {
            Regex::new(&format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>")).expect("valid regex")
        })
    })
}

fn field(entry: &str, re: &Regex) -> String {
    re.captures(entry)
        .and_then(|c| c.get(1))
        .map(|m| collapse_whitespace(&unescape_xml(m.as_str())))
        .unwrap_or_default()
}

/// Parse paper entries out of an Atom feed.
pub fn parse_feed(feed: &str) -> Vec<Paper> {
    let [title, summary, id, published] = field_res();
    entry_re()
        .captures_iter(feed)
        .filter_map(|c| c.get(1))
        .map(|m| {
            let entry = m.as_str();
            Paper {
                title: field(entry, title),
                summary: field(entry, summary),
                url: field(entry, id),
                published: field(entry, published),
            }
        })
        .filter(|p| !p.title.is_empty())
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
