//! Ask command implementation.

use crate::agent::{create_agent, AgentResponse};
use crate::answer::FinalAnswer;
use crate::cli::preflight;
use crate::cli::{Output, SAMPLE_QUESTION};
use crate::config::Settings;
use crate::retriever::AnswerStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Load the answer store from the override path or the configured one.
pub(crate) fn load_answer_store(
    records: Option<&str>,
    settings: &Settings,
) -> Result<Option<Arc<AnswerStore>>> {
    let path = match records {
        Some(p) => Some(Settings::expand_path(p)),
        None => settings.records_path(),
    };

    match path {
        Some(path) => {
            let store = AnswerStore::load(&path, &settings.retriever)?;
            Ok(Some(Arc::new(store)))
        }
        None => Ok(None),
    }
}

/// Run the ask command.
pub async fn run_ask(
    question: Option<String>,
    model: Option<String>,
    records: Option<String>,
    trace: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check_ask(&settings) {
        Output::error(&format!("{}", e));
        Output::status("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let question = question.unwrap_or_else(|| SAMPLE_QUESTION.to_string());
    let model = model.unwrap_or_else(|| settings.llm.model.clone());

    let answers = load_answer_store(records.as_deref(), &settings)?;
    let agent = create_agent(&settings, answers, &model)?;
    Output::status(&format!("Agent created with model {}", agent.model()));
    debug!("System prompt:\n{}", agent.system_prompt());

    let spinner = Output::spinner("Agent working...");
    let result = agent.run(&question).await;
    spinner.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    };

    if trace {
        Output::status_header("Agent response");
        eprintln!("{}", response.content);

        if !response.tool_calls.is_empty() {
            Output::status_header(&format!("Tool calls ({})", response.tool_calls.len()));
            for call in &response.tool_calls {
                Output::status(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
            }
        }
        eprintln!();
    }

    println!("{}", answer_output(&response));

    Output::status(&format!("Completed in {} iteration(s)", response.iterations));

    Ok(())
}

/// The only text `ask` writes to stdout.
fn answer_output(response: &AgentResponse) -> String {
    match response.final_answer() {
        FinalAnswer::Marked(answer) => answer,
        FinalAnswer::Unmarked(raw) => {
            warn!("Response has no final answer line, printing it unchanged");
            raw
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len.saturating_sub(3)) {
        Some((idx, _)) if s.chars().count() > max_len => format!("{}...", &s[..idx]),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 60), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    fn response(content: &str) -> AgentResponse {
        AgentResponse {
            content: content.to_string(),
            tool_calls: Vec::new(),
            iterations: 2,
        }
    }

    #[test]
    fn test_answer_output_is_answer_only() {
        let out = answer_output(&response("Looked it up.\nFINAL ANSWER: Oslo"));
        assert_eq!(out, "Oslo");
        assert!(!out.contains("iteration"));
    }

    #[test]
    fn test_answer_output_passes_unmarked_through() {
        assert_eq!(answer_output(&response("  Probably Oslo.\n")), "Probably Oslo.");
    }

    #[test]
    fn test_load_answer_store_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"task_id": "x", "Question": "q", "Final answer": "a"}}"#).unwrap();

        let settings = Settings::default();
        let store = load_answer_store(file.path().to_str(), &settings)
            .unwrap()
            .unwrap();
        assert_eq!(store.len(), 1);

        assert!(load_answer_store(None, &settings).unwrap().is_none());
    }
}
