//! Tool backend tests against mocked services.
//!
//! These tests use wiremock to stand in for the web search, Wikipedia and
//! arXiv APIs, and check how responses are rendered for the model.

use serde_json::json;
use svar::config::{ArxivSettings, SearchSettings, WikipediaSettings};
use svar::integrations::{http_client, ArxivSearch, WebSearch, Wikipedia};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Web search =============

fn search_settings(server: &MockServer, api_key: Option<&str>) -> SearchSettings {
    SearchSettings {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
        ..SearchSettings::default()
    }
}

#[tokio::test]
async fn test_web_search_renders_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"query": "principle of double effect", "max_results": 6})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "principle of double effect",
            "answer": null,
            "results": [
                {
                    "title": "Principle of double effect - Wikipedia",
                    "url": "https://en.wikipedia.org/wiki/Principle_of_double_effect",
                    "content": "The principle of double effect is a set of ethical criteria...",
                    "score": 0.98
                },
                {
                    "title": "Double Effect, Doctrine of",
                    "url": "https://plato.stanford.edu/entries/double-effect/",
                    "content": "Thomas Aquinas is credited with introducing the principle."
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let search = WebSearch::new(http_client().unwrap(), &search_settings(&server, Some("test-key")));
    let out = search.search("principle of double effect", None).await.unwrap();

    assert!(out.starts_with("1. Principle of double effect - Wikipedia"));
    assert!(out.contains("2. Double Effect, Doctrine of"));
    assert!(out.contains("https://plato.stanford.edu/entries/double-effect/"));
    assert!(!out.contains("Summary:"));
}

#[tokio::test]
async fn test_web_search_without_key_fails_on_use() {
    let server = MockServer::start().await;

    let mut settings = search_settings(&server, None);
    settings.api_key = Some(String::new());
    let search = WebSearch::new(http_client().unwrap(), &settings);

    // Only meaningful when the environment does not provide a key either.
    if !search.has_api_key() {
        let err = search.search("anything", None).await.unwrap_err();
        assert!(err.to_string().contains("no API key"));
    }
}

#[tokio::test]
async fn test_web_search_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let search = WebSearch::new(http_client().unwrap(), &search_settings(&server, Some("bad")));
    let err = search.search("anything", Some(2)).await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

// ============= Wikipedia =============

fn wikipedia(server: &MockServer, max_chars: usize) -> Wikipedia {
    let settings = WikipediaSettings {
        api_url: format!("{}/w/api.php", server.uri()),
        lang: "en".to_string(),
        max_chars,
    };
    Wikipedia::new(http_client().unwrap(), &settings)
}

#[tokio::test]
async fn test_wikipedia_search_loads_top_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .and(query_param("srsearch", "double effect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"search": [
                {"ns": 0, "title": "Principle of double effect", "pageid": 2}
            ]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .and(query_param("titles", "Principle of double effect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"pages": [
                {
                    "pageid": 2,
                    "ns": 0,
                    "title": "Principle of double effect",
                    "extract": "The principle of double effect is attributed to Thomas Aquinas."
                }
            ]}
        })))
        .mount(&server)
        .await;

    let out = wikipedia(&server, 8000).search("double effect").await.unwrap();
    assert!(out.starts_with("# Principle of double effect"));
    assert!(out.contains("Thomas Aquinas"));
}

#[tokio::test]
async fn test_wikipedia_missing_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"pages": [
                {"ns": 0, "title": "No such page", "missing": true}
            ]}
        })))
        .mount(&server)
        .await;

    let err = wikipedia(&server, 8000).page("No such page").await.unwrap_err();
    assert!(err.to_string().contains("No page titled"));
}

#[tokio::test]
async fn test_wikipedia_page_is_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [
                {"title": "Long", "extract": "x".repeat(500)}
            ]}
        })))
        .mount(&server)
        .await;

    let out = wikipedia(&server, 100).page("Long").await.unwrap();
    assert!(out.ends_with("[... truncated]"));
    assert!(out.len() < 200);
}

#[tokio::test]
async fn test_wikipedia_search_without_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"search": []}
        })))
        .mount(&server)
        .await;

    let out = wikipedia(&server, 100).search("qwxzv").await.unwrap();
    assert!(out.starts_with("No Wikipedia pages found"));
}

// ============= arXiv =============

#[tokio::test]
async fn test_arxiv_search_renders_papers() {
    let server = MockServer::start().await;

    let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query</title>
  <entry>
    <id>http://arxiv.org/abs/2311.12983v1</id>
    <published>2023-11-21T20:34:47Z</published>
    <title>GAIA: a benchmark for General AI Assistants</title>
    <summary>We introduce GAIA, a benchmark for General AI Assistants.</summary>
  </entry>
</feed>"#;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:gaia benchmark"))
        .and(query_param("max_results", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;

    let settings = ArxivSettings {
        base_url: server.uri(),
        max_results: 3,
    };
    let arxiv = ArxivSearch::new(http_client().unwrap(), &settings);
    let out = arxiv.search("gaia benchmark").await.unwrap();

    assert!(out.starts_with("GAIA: a benchmark for General AI Assistants"));
    assert!(out.contains("URL: http://arxiv.org/abs/2311.12983v1"));
    assert!(out.contains("Published: 2023-11-21T20:34:47Z"));
}
