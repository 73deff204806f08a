//! Question-answering agent with tool calling.
//!
//! Provides an LLM agent that can search the web, arXiv and Wikipedia, run
//! Python, read images and consult the local answer store before committing
//! to a final answer.

mod runner;
mod tools;

pub use runner::{create_agent, Agent, AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, LOOKUP_ANSWERS};
