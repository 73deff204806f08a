//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub arxiv: ArxivSettings,
    pub wikipedia: WikipediaSettings,
    pub code: CodeSettings,
    pub ocr: OcrSettings,
    pub retriever: RetrieverSettings,
    pub answer: AnswerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary files (code interpreter scripts).
    pub temp_dir: String,
    /// Log level without `-v` flags (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/svar".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Hosted inference endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier passed to the endpoint.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum LLM calls per question.
    pub max_iterations: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "qwen-qwq-32b".to_string(),
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 300,
            max_iterations: 15,
        }
    }
}

/// Web search (Tavily) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// API key. Falls back to `TAVILY_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Base URL of the search API.
    pub base_url: String,
    /// Maximum results per query.
    pub max_results: u32,
    /// Search depth ("basic" or "advanced").
    pub search_depth: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.tavily.com".to_string(),
            max_results: 6,
            search_depth: "basic".to_string(),
        }
    }
}

impl SearchSettings {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("TAVILY_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

/// arXiv search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivSettings {
    pub base_url: String,
    pub max_results: u32,
}

impl Default for ArxivSettings {
    fn default() -> Self {
        Self {
            base_url: "https://export.arxiv.org".to_string(),
            max_results: 3,
        }
    }
}

/// Wikipedia lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaSettings {
    /// MediaWiki API endpoint. `{lang}` is replaced with the language code.
    pub api_url: String,
    /// Language edition.
    pub lang: String,
    /// Maximum characters of page text returned to the agent.
    pub max_chars: usize,
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            api_url: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            lang: "en".to_string(),
            max_chars: 8000,
        }
    }
}

impl WikipediaSettings {
    /// API endpoint with the language substituted.
    pub fn endpoint(&self) -> String {
        self.api_url.replace("{lang}", &self.lang)
    }
}

/// Code interpreter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSettings {
    /// Interpreter binary.
    pub python: String,
    /// Wall-clock limit per execution.
    pub timeout_secs: u64,
    /// Maximum characters kept from each output stream.
    pub max_output_chars: usize,
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            timeout_secs: 30,
            max_output_chars: 10_000,
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// OCR engine binary.
    pub command: String,
    /// Tesseract language code(s), e.g. "eng" or "eng+deu".
    pub language: Option<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: None,
        }
    }
}

/// Answer retriever settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverSettings {
    /// JSONL file with question/answer records. No retriever tool when unset.
    pub records_path: Option<String>,
    /// Number of records returned per lookup.
    pub top_k: usize,
    /// BM25 term frequency saturation.
    pub k1: f32,
    /// BM25 length normalization.
    pub b: f32,
}

impl Default for RetrieverSettings {
    fn default() -> Self {
        Self {
            records_path: None,
            top_k: 3,
            k1: 1.2,
            b: 0.75,
        }
    }
}

/// Final answer handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AnswerSettings {
    /// Times the model is reminded of the output format when it omits the
    /// final answer marker. Zero passes the raw response through.
    pub format_retries: u32,
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Get the expanded record file path, if configured.
    pub fn records_path(&self) -> Option<PathBuf> {
        self.retriever
            .records_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "llama-3.3-70b-versatile"

            [retriever]
            records_path = "~/gaia/metadata.jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(settings.llm.max_iterations, 15);
        assert_eq!(settings.retriever.top_k, 3);
        assert_eq!(settings.search.max_results, 6);
        assert!(settings.records_path().is_some());
    }

    #[test]
    fn test_wikipedia_endpoint() {
        let mut wiki = WikipediaSettings::default();
        wiki.lang = "de".to_string();
        assert_eq!(wiki.endpoint(), "https://de.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.answer.format_retries = 2;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.answer.format_retries, 2);
        assert_eq!(loaded.llm.api_key_env, "GROQ_API_KEY");
    }

    #[test]
    fn test_empty_records_path_is_unset() {
        let mut settings = Settings::default();
        settings.retriever.records_path = Some(String::new());
        assert!(settings.records_path().is_none());
    }
}
