//! Tools command implementation.

use crate::agent::{tool_definitions, LOOKUP_ANSWERS};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;

/// List the tools the model can call.
pub fn run_tools(settings: &Settings) -> Result<()> {
    Output::header("Agent tools");

    let has_records = settings.records_path().is_some();
    for tool in tool_definitions() {
        let name = tool.function.name;
        let description = tool.function.description.unwrap_or_default();

        if name == LOOKUP_ANSWERS && !has_records {
            println!(
                "  {} {} {}",
                style("-").dim(),
                style(&name).dim(),
                style("(disabled: no record file configured)").dim()
            );
            continue;
        }

        println!("  {} {}", style("*").cyan(), style(&name).bold());
        println!("    {}", style(description).dim());
    }

    if settings.search.resolve_api_key().is_none() {
        println!();
        Output::warning("TAVILY_API_KEY not set; web_search calls will fail.");
    }

    Ok(())
}
