//! Lookup command implementation.

use super::ask::load_answer_store;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the lookup command.
pub fn run_lookup(query: &str, records: Option<String>, limit: usize, settings: Settings) -> Result<()> {
    let Some(store) = load_answer_store(records.as_deref(), &settings)? else {
        Output::error("No record file configured.");
        Output::info("Pass --records <file.jsonl> or set retriever.records_path in the config.");
        anyhow::bail!("answer retriever is not configured");
    };

    let hits = store.search(query, limit);
    if hits.is_empty() {
        Output::warning(crate::retriever::NO_MATCH);
        return Ok(());
    }

    Output::success(&format!("Found {} of {} records", hits.len(), store.len()));
    for hit in &hits {
        Output::lookup_hit(&hit.record.task_id, hit.score, &hit.record.question, &hit.record.answer);
    }

    Ok(())
}
