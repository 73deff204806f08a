//! Configuration module for Svar.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts};
pub use settings::{
    AnswerSettings, ArxivSettings, CodeSettings, GeneralSettings, LlmSettings, OcrSettings,
    PromptSettings, RetrieverSettings, SearchSettings, Settings, WikipediaSettings,
};
