//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::integrations::CodeInterpreter;
use crate::ocr::OcrEngine;
use crate::retriever::load_records;
use console::style;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    Output::header("Svar Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    // Tesseract and Python are only needed when the model calls them.
    println!("{}", style("External Tools").bold());
    let ocr = OcrEngine::new(&settings.ocr);
    let interpreter = CodeInterpreter::new(&settings.code, settings.temp_dir());
    let tool_checks = vec![
        check_tool(ocr.command(), "--version", install_hint_tesseract()),
        check_tool(interpreter.python(), "--version", install_hint_python()),
    ];
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);

    println!();

    println!("{}", style("API Configuration").bold());
    let key_checks = vec![
        check_api_key(&settings.llm.api_key_env, true),
        check_search_key(settings),
    ];
    for check in &key_checks {
        check.print();
    }
    checks.extend(key_checks);
    Output::kv("Endpoint", &settings.llm.api_base);
    Output::kv("Model", &settings.llm.model);

    println!();

    println!("{}", style("Answer Records").bold());
    let records_check = check_records(settings);
    records_check.print();
    checks.push(records_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);
    let config_check = check_config_file(&config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Svar.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Svar is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available. A missing tool is a warning.
fn check_tool(cmd: &str, version_arg: &str, hint: &str) -> CheckResult {
    let fail = |message: &str| CheckResult::warning(cmd, message, hint);

    match Command::new(cmd).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            // Some tools print their version on stderr.
            let text = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).to_string()
            } else {
                String::from_utf8_lossy(&output.stdout).to_string()
            };
            let version = text.lines().next().unwrap_or("installed").trim().to_string();

            let version_display = if version.chars().count() > 50 {
                format!("{}...", version.chars().take(50).collect::<String>())
            } else {
                version
            };

            CheckResult::ok(cmd, &version_display)
        }
        Ok(_) => fail("installed but not working"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => fail("not found"),
        Err(e) => fail(&format!("error: {}", e)),
    }
}

/// Check if an API key environment variable is set.
fn check_api_key(var: &str, required: bool) -> CheckResult {
    let hint = format!("Set with: export {}='...'", var);
    match std::env::var(var) {
        Ok(key) if key.len() > 12 => {
            let masked = format!(
                "{}...{}",
                key.chars().take(4).collect::<String>(),
                key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect::<String>()
            );
            CheckResult::ok(var, &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(var, "empty", &hint),
        Ok(_) => CheckResult::warning(var, "set but looks too short", &hint),
        Err(_) if required => CheckResult::error(var, "not set", &hint),
        Err(_) => CheckResult::warning(var, "not set", &hint),
    }
}

/// The search key may come from the config file instead of the environment.
fn check_search_key(settings: &Settings) -> CheckResult {
    match &settings.search.api_key {
        Some(key) if !key.is_empty() => CheckResult::ok("Web search key", "configured in config file"),
        _ => check_api_key("TAVILY_API_KEY", false),
    }
}

/// Check the configured record file loads.
fn check_records(settings: &Settings) -> CheckResult {
    let Some(path) = settings.records_path() else {
        return CheckResult::warning(
            "Record file",
            "not configured (lookup_answers tool disabled)",
            "Set retriever.records_path in the config or pass --records",
        );
    };

    if !path.exists() {
        return CheckResult::error(
            "Record file",
            &format!("{} does not exist", path.display()),
            "Fix retriever.records_path in the config",
        );
    }

    match load_records(&path) {
        Ok(records) => CheckResult::ok(
            "Record file",
            &format!("{} ({} records)", path.display(), records.len()),
        ),
        Err(e) => CheckResult::error(
            "Record file",
            &format!("{}", e),
            "Each line must be a JSON object with task_id, Question and Final answer",
        ),
    }
}

/// Check if the config file in use exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: svar config edit",
        )
    }
}

/// Platform-specific install hint for tesseract.
fn install_hint_tesseract() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install tesseract"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install tesseract-ocr (or your package manager)"
    } else {
        "Install from: https://github.com/tesseract-ocr/tesseract"
    }
}

/// Platform-specific install hint for Python.
fn install_hint_python() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install python"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install python3 (or your package manager)"
    } else {
        "Install from: https://www.python.org/downloads/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_missing_optional_tool_is_warning() {
        let result = check_tool("definitely-not-installed-xyz", "--version", "hint");
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.message, "not found");
    }

    #[test]
    fn test_explicit_config_file_is_checked() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = check_config_file(file.path());
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.message, file.path().display().to_string());

        let missing = check_config_file(Path::new("/nonexistent/svar/other.toml"));
        assert_eq!(missing.status, CheckStatus::Warning);
        assert_eq!(missing.message, "using defaults");
    }

    #[test]
    fn test_configured_binaries_are_checked() {
        let mut settings = Settings::default();
        settings.ocr.command = "definitely-not-tesseract-xyz".to_string();
        let ocr = OcrEngine::new(&settings.ocr);
        let result = check_tool(ocr.command(), "--version", install_hint_tesseract());
        assert_eq!(result.name, "definitely-not-tesseract-xyz");
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_unconfigured_records_is_warning() {
        let result = check_records(&Settings::default());
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_missing_records_file_is_error() {
        let mut settings = Settings::default();
        settings.retriever.records_path = Some("/nonexistent/metadata.jsonl".to_string());
        assert_eq!(check_records(&settings).status, CheckStatus::Error);
    }
}
