//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Question used when `ask` is run without one.
pub const SAMPLE_QUESTION: &str = "When was a picture of St. Thomas Aquinas first added to the Wikipedia page on the Principle of double effect?";

/// Svar - Benchmark Question Answering Agent
///
/// Answers benchmark questions with web search, arXiv, Wikipedia, Python, OCR
/// and a keyword retriever over previously answered questions.
/// The name "Svar" is the Norwegian/Scandinavian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question with the agent and print the final answer
    Ask {
        /// The question to answer (defaults to a sample benchmark question)
        question: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// JSONL file of answered questions for the lookup tool
        #[arg(short, long)]
        records: Option<String>,

        /// Also print the full response and the tool calls made
        #[arg(long)]
        trace: bool,
    },

    /// Query the answer retriever directly
    Lookup {
        /// Question text or keywords
        query: String,

        /// JSONL file of answered questions
        #[arg(short, long)]
        records: Option<String>,

        /// Maximum number of matches
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Extract text from an image with OCR
    Ocr {
        /// Path to the image file
        path: String,
    },

    /// List the tools exposed to the model
    Tools,

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
