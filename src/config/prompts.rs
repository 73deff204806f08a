//! Prompt templates for Svar.
//!
//! Prompts can be customized by placing an `agent.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the question-answering agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    /// System instruction. `{{agent_name}}` is substituted at render time.
    pub system: String,
    /// Follow-up sent when a response lacks the final answer line.
    pub format_reminder: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are **{{agent_name}}**, an autonomous assistant evaluated by the GAIA benchmark.

TOOLS YOU CAN CALL
------------------
- web_search for searching the web
- arxiv_search for academic paper search
- wikipedia_search and wikipedia_page for general knowledge
- run_python for executing code and performing calculations
- extract_text_from_image for extracting text from images
- lookup_answers for finding previously answered questions similar to this one

RULES
-----
- Each task expects ONE exact answer.
- Think step by step and call tools whenever a fact must be checked.
- Finish with the line: FINAL ANSWER: <answer>
- Use as few words or characters as possible.
- When the answer is a number, write it as a bare number with no thousands
  separators and no units (%, $, etc.) unless the question explicitly asks for them.
- When the answer is a string, use as few words as possible, with no articles
  and no abbreviations.
- When the answer is a list, separate the items with a comma followed by exactly
  one space, applying the rules above to every item."#
                .to_string(),

            format_reminder: r#"Your previous reply did not end with the required answer line.
Reply again with only the line:
FINAL ANSWER: <answer>"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let agent_path = custom_path.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The agent system prompt with variables applied.
    pub fn agent_system(&self) -> String {
        let mut vars = std::collections::HashMap::new();
        if !self.variables.contains_key("agent_name") {
            vars.insert("agent_name".to_string(), "GaiaAgent".to_string());
        }
        self.render_with_custom(&self.agent.system, &vars)
    }
}
