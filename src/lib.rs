//! Svar - Benchmark Question Answering Agent
//!
//! A CLI agent that answers benchmark (GAIA style) questions with the help of
//! web search, arXiv, Wikipedia, a Python interpreter, OCR and a keyword
//! retriever over previously answered questions.
//!
//! The name "Svar" is the Norwegian/Scandinavian word for "answer."
//!
//! # Architecture
//!
//! - `config` - Configuration management and prompt templates
//! - `agent` - Tool-calling loop and tool registry
//! - `integrations` - Web search, arXiv, Wikipedia and code execution clients
//! - `ocr` - Text extraction from images
//! - `retriever` - Record loading and BM25 answer lookup
//! - `answer` - Final answer extraction from model output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use svar::agent::create_agent;
//! use svar::config::Settings;
//! use svar::retriever::AnswerStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let store = AnswerStore::load("metadata.jsonl".as_ref(), &settings.retriever)?;
//!     let agent = create_agent(&settings, Some(Arc::new(store)), &settings.llm.model)?;
//!
//!     let response = agent.run("What is the capital of Norway?").await?;
//!     println!("{}", response.final_answer());
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod answer;
pub mod cli;
pub mod config;
pub mod error;
pub mod integrations;
pub mod ocr;
pub mod openai;
pub mod retriever;

pub use error::{Result, SvarError};
