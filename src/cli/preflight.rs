//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SvarError};

/// Run pre-flight checks before asking the agent.
///
/// The web search key is not checked here. A missing key surfaces as a
/// tool error when the model calls the search tool.
pub fn check_ask(settings: &Settings) -> Result<()> {
    check_endpoint(&settings.llm.api_base)?;
    check_api_key(&settings.llm.api_key_env)
}

/// Check the LLM endpoint is an absolute http(s) URL.
fn check_endpoint(api_base: &str) -> Result<()> {
    let url = url::Url::parse(api_base)
        .map_err(|e| SvarError::Config(format!("Invalid llm.api_base '{}': {}", api_base, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SvarError::Config(format!(
            "llm.api_base must use http or https, got '{}'",
            scheme
        ))),
    }
}

/// Check if the LLM API key is configured.
fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SvarError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        Err(_) => Err(SvarError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_endpoint_fails_before_key_check() {
        let mut settings = Settings::default();
        settings.llm.api_base = "not a url".to_string();
        let err = check_ask(&settings).unwrap_err();
        assert!(err.to_string().contains("Invalid llm.api_base"));
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(check_endpoint("https://api.groq.com/openai/v1").is_ok());
        assert!(check_endpoint("http://localhost:11434/v1").is_ok());
        assert!(check_endpoint("api.groq.com/openai/v1").is_err());
        assert!(check_endpoint("ftp://example.com").is_err());
    }

    #[test]
    fn test_missing_key_is_reported_by_name() {
        let mut settings = Settings::default();
        settings.llm.api_key_env = "SVAR_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = check_ask(&settings).unwrap_err();
        assert!(err.to_string().contains("SVAR_TEST_KEY_THAT_IS_NEVER_SET not set"));
    }
}
