//! Code execution in a local Python process.

use super::wikipedia::truncate_chars;
use crate::config::CodeSettings;
use crate::error::{Result, SvarError};
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, instrument};

/// Runs Python snippets with a wall-clock limit.
pub struct CodeInterpreter {
    python: String,
    timeout: Duration,
    max_output_chars: usize,
    work_dir: PathBuf,
}

/// Captured result of one execution.
#[derive(Debug, Clone)]
pub struct Execution {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl Execution {
    /// Render for the agent.
    pub fn render(&self) -> String {
        let mut out = format!("StdOut:\n{}\nStdErr:\n{}", self.stdout, self.stderr);
        match self.exit_code {
            Some(0) => {}
            Some(code) => out.push_str(&format!("\nExit code: {}", code)),
            None => out.push_str("\nProcess terminated by signal"),
        }
        out
    }
}

impl CodeInterpreter {
    pub fn new(settings: &CodeSettings, work_dir: PathBuf) -> Self {
        Self {
            python: settings.python.clone(),
            timeout: Duration::from_secs(settings.timeout_secs.max(1)),
            max_output_chars: settings.max_output_chars,
            work_dir,
        }
    }

    /// Interpreter binary.
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Execute a snippet and capture its output.
    #[instrument(skip(self, code), fields(code_len = code.len()))]
    pub async fn execute(&self, code: &str) -> Result<Execution> {
        std::fs::create_dir_all(&self.work_dir)?;

        let mut script = tempfile::Builder::new()
            .prefix("svar-")
            .suffix(".py")
            .tempfile_in(&self.work_dir)?;
        script.write_all(code.as_bytes())?;
        script.flush()?;

        let child = tokio::process::Command::new(&self.python)
            .arg(script.path())
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SvarError::ToolNotFound(self.python.clone())
                } else {
                    SvarError::CodeExecution(format!("Failed to start {}: {}", self.python, e))
                }
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                SvarError::CodeExecution(format!(
                    "execution timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        debug!("Python exited with {}", output.status);

        Ok(Execution {
            stdout: truncate_chars(&String::from_utf8_lossy(&output.stdout), self.max_output_chars),
            stderr: truncate_chars(&String::from_utf8_lossy(&output.stderr), self.max_output_chars),
            exit_code: output.status.code(),
        })
    }

    /// Execute a snippet and render the result for the agent.
    pub async fn run(&self, code: &str) -> Result<String> {
        Ok(self.execute(code).await?.render())
    }
}
