//! Tool definitions and dispatch for the agent.

use crate::config::Settings;
use crate::error::{Result, SvarError};
use crate::integrations::{self, ArxivSearch, CodeInterpreter, WebSearch, Wikipedia};
use crate::ocr::OcrEngine;
use crate::retriever::AnswerStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Name of the answer retriever tool.
pub const LOOKUP_ANSWERS: &str = "lookup_answers";

/// Available tools for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search the web.
    WebSearch {
        query: String,
        max_results: Option<u32>,
    },

    /// Search arXiv for papers.
    ArxivSearch { query: String },

    /// Search Wikipedia and load the best page.
    WikipediaSearch { query: String },

    /// Load a Wikipedia page by title.
    WikipediaPage { title: String },

    /// Execute Python code.
    RunPython { code: String },

    /// Run OCR on an image file.
    ExtractTextFromImage { image_path: String },

    /// Look up previously answered questions.
    LookupAnswers { query: String },
}

/// Tool execution context with access to every backend.
pub struct ToolContext {
    pub web: WebSearch,
    pub arxiv: ArxivSearch,
    pub wikipedia: Wikipedia,
    pub code: CodeInterpreter,
    pub ocr: OcrEngine,
    pub answers: Option<Arc<AnswerStore>>,
}

impl ToolContext {
    /// Build every backend from settings. The answer store is optional.
    pub fn from_settings(settings: &Settings, answers: Option<Arc<AnswerStore>>) -> Result<Self> {
        let http = integrations::http_client()?;

        Ok(Self {
            web: WebSearch::new(http.clone(), &settings.search),
            arxiv: ArxivSearch::new(http.clone(), &settings.arxiv),
            wikipedia: Wikipedia::new(http, &settings.wikipedia),
            code: CodeInterpreter::new(&settings.code, settings.temp_dir()),
            ocr: OcrEngine::new(&settings.ocr),
            answers,
        })
    }

    /// Definitions of the tools this context can actually serve.
    pub fn definitions(&self) -> Vec<async_openai::types::ChatCompletionTool> {
        tool_definitions()
            .into_iter()
            .filter(|t| self.answers.is_some() || t.function.name != LOOKUP_ANSWERS)
            .collect()
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::WebSearch { query, max_results } => self.web.search(query, *max_results).await,
            ToolCall::ArxivSearch { query } => self.arxiv.search(query).await,
            ToolCall::WikipediaSearch { query } => self.wikipedia.search(query).await,
            ToolCall::WikipediaPage { title } => self.wikipedia.page(title).await,
            ToolCall::RunPython { code } => self.code.run(code).await,
            ToolCall::ExtractTextFromImage { image_path } => Ok(self
                .ocr
                .extract_text_from_image(Path::new(image_path))
                .await),
            ToolCall::LookupAnswers { query } => {
                let store = self.answers.as_ref().ok_or_else(|| {
                    SvarError::Agent("Answer retriever is not configured".to_string())
                })?;
                Ok(store.lookup(query))
            }
        }
    }
}

fn function_tool(
    name: &str,
    description: &str,
    parameters: serde_json::Value,
) -> async_openai::types::ChatCompletionTool {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: name.to_string(),
            description: Some(description.to_string()),
            parameters: Some(parameters),
            strict: None,
        },
    }
}

fn single_string_schema(field: &str, description: &str) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        field.to_string(),
        serde_json::json!({
            "type": "string",
            "description": description
        }),
    );

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": [field]
    })
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    vec![
        function_tool(
            "web_search",
            "Search the web for current information. Returns titles, URLs and content \
            snippets of the best matching pages.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results (default: 6)"
                    }
                },
                "required": ["query"]
            }),
        ),
        function_tool(
            "arxiv_search",
            "Search arXiv for academic papers. Returns title, publication date, URL and \
            abstract of the most relevant papers.",
            single_string_schema("query", "The search query"),
        ),
        function_tool(
            "wikipedia_search",
            "Search Wikipedia and return the text of the best matching page. \
            Use this for general knowledge questions.",
            single_string_schema("query", "The search query"),
        ),
        function_tool(
            "wikipedia_page",
            "Load the text of a Wikipedia page by its exact title.",
            single_string_schema("title", "The page title"),
        ),
        function_tool(
            "run_python",
            "Execute Python code and return its stdout and stderr. Use this for \
            calculations and data processing. Print the values you need.",
            single_string_schema("code", "Python source code to execute"),
        ),
        function_tool(
            "extract_text_from_image",
            "Extract text from an image file using OCR.",
            single_string_schema("image_path", "Path to the image file"),
        ),
        function_tool(
            LOOKUP_ANSWERS,
            "Look up previously answered benchmark questions similar to the query. \
            Returns up to three question/answer pairs.",
            single_string_schema("query", "Question text or keywords"),
        ),
    ]
}

fn required_str(args: &serde_json::Value, key: &str) -> Result<String> {
    args[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SvarError::Agent(format!("Missing '{}' argument", key)))
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(arguments)
            .map_err(|e| SvarError::Agent(format!("Invalid tool arguments: {}", e)))?
    };

    match name {
        "web_search" => Ok(ToolCall::WebSearch {
            query: required_str(&args, "query")?,
            max_results: args["max_results"].as_u64().map(|n| n as u32),
        }),
        "arxiv_search" => Ok(ToolCall::ArxivSearch {
            query: required_str(&args, "query")?,
        }),
        "wikipedia_search" => Ok(ToolCall::WikipediaSearch {
            query: required_str(&args, "query")?,
        }),
        "wikipedia_page" => Ok(ToolCall::WikipediaPage {
            title: required_str(&args, "title")?,
        }),
        "run_python" => Ok(ToolCall::RunPython {
            code: required_str(&args, "code")?,
        }),
        "extract_text_from_image" => Ok(ToolCall::ExtractTextFromImage {
            image_path: required_str(&args, "image_path")?,
        }),
        LOOKUP_ANSWERS => Ok(ToolCall::LookupAnswers {
            query: required_str(&args, "query")?,
        }),
        _ => Err(SvarError::Agent(format!("Unknown tool: {}", name))),
    }
}
