//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, ToolContext};
use crate::answer::FinalAnswer;
use crate::config::{Prompts, Settings};
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use crate::retriever::AnswerStore;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Default iteration budget per question.
const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Agent that answers a question by calling tools.
pub struct Agent {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
    tools: ToolContext,
    max_iterations: usize,
    format_retries: u32,
    system_prompt: String,
    format_reminder: String,
}

impl Agent {
    /// Create a new agent with the given client, tool context and model.
    pub fn new(client: async_openai::Client<OpenAIConfig>, tools: ToolContext, model: &str) -> Self {
        let prompts = Prompts::default();
        Self {
            client,
            model: model.to_string(),
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            format_retries: 0,
            system_prompt: prompts.agent_system(),
            format_reminder: prompts.agent.format_reminder,
        }
    }

    /// Use the system prompt and format reminder from a prompt set.
    pub fn with_prompts(mut self, prompts: &Prompts) -> Self {
        self.system_prompt = prompts.agent_system();
        self.format_reminder = prompts.agent.format_reminder.clone();
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Remind the model of the answer format up to `retries` times.
    pub fn with_format_retries(mut self, retries: u32) -> Self {
        self.format_retries = retries;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run the agent on a question.
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn run(&self, question: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(question.to_string())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?
                .into(),
        ];

        let tool_definitions = self.tools.definitions();
        let mut iterations = 0;
        let mut reminders_sent = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(SvarError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tool_definitions.clone())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| SvarError::Llm(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| SvarError::Agent("No response from model".to_string()))?;

            let tool_calls = choice
                .message
                .tool_calls
                .as_ref()
                .filter(|calls| !calls.is_empty());

            let Some(tool_calls) = tool_calls else {
                let content = choice.message.content.clone().unwrap_or_default();

                if reminders_sent < self.format_retries && !FinalAnswer::parse(&content).is_marked() {
                    reminders_sent += 1;
                    warn!(
                        "Response has no final answer line, sending format reminder {}/{}",
                        reminders_sent, self.format_retries
                    );
                    messages.push(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(content)
                            .build()
                            .map_err(|e| SvarError::Agent(e.to_string()))?
                            .into(),
                    );
                    messages.push(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(self.format_reminder.clone())
                            .build()
                            .map_err(|e| SvarError::Agent(e.to_string()))?
                            .into(),
                    );
                    continue;
                }

                return Ok(AgentResponse {
                    content,
                    tool_calls: tool_calls_made,
                    iterations,
                });
            };

            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| SvarError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Build the question-answering agent from settings.
///
/// The answer store, when given, is exposed to the model as the `lookup_answers` tool.
pub fn create_agent(
    settings: &Settings,
    answers: Option<Arc<AnswerStore>>,
    model: &str,
) -> Result<Agent> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let client = create_client(&settings.llm)?;
    let tools = ToolContext::from_settings(settings, answers)?;

    Ok(Agent::new(client, tools, model)
        .with_prompts(&prompts)
        .with_max_iterations(settings.llm.max_iterations)
        .with_format_retries(settings.answer.format_retries))
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

impl AgentResponse {
    /// The answer extracted from the final response.
    pub fn final_answer(&self) -> FinalAnswer {
        FinalAnswer::parse(&self.content)
    }
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "web_search".to_string(),
            arguments: r#"{"query": "test"}"#.to_string(),
            result: "Found results".to_string(),
        };
        assert_eq!(format!("{}", record), r#"web_search({"query": "test"})"#);
    }

    #[test]
    fn test_final_answer_from_response() {
        let response = AgentResponse {
            content: "Checked the page history.\nFINAL ANSWER: 19/10/2003".to_string(),
            tool_calls: Vec::new(),
            iterations: 3,
        };
        assert_eq!(response.final_answer().text(), "19/10/2003");
    }

    #[test]
    fn test_create_agent_applies_settings() {
        let mut settings = Settings::default();
        settings.llm.max_iterations = 4;
        settings.answer.format_retries = 1;
        settings
            .prompts
            .variables
            .insert("agent_name".to_string(), "Svar".to_string());

        let agent = create_agent(&settings, None, "llama-3.3-70b-versatile").unwrap();
        assert_eq!(agent.model(), "llama-3.3-70b-versatile");
        assert_eq!(agent.max_iterations, 4);
        assert_eq!(agent.format_retries, 1);
        assert!(agent.system_prompt().starts_with("You are **Svar**"));
    }
}
