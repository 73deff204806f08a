//! Final answer extraction from model output.
//!
//! Grammar of the answer line:
//!
//! ```text
//! line   := marker ws* body
//! marker := "FINAL ANSWER:"      (ASCII case-insensitive)
//! body   := any text up to the end of the line, trimmed
//! ```
//!
//! The last marker in the response wins, so an answer restated after some
//! reasoning replaces an earlier draft. A response without a marker, or with
//! an empty body after the last marker, is passed through trimmed.

use std::fmt;

/// Marker the model is instructed to put in front of its answer.
pub const FINAL_ANSWER_MARKER: &str = "FINAL ANSWER:";

/// Outcome of parsing a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalAnswer {
    /// Text following the final answer marker.
    Marked(String),
    /// No usable marker; the full trimmed response.
    Unmarked(String),
}

impl FinalAnswer {
    /// Parse a model response.
    pub fn parse(response: &str) -> Self {
        match find_marked_body(response) {
            Some(body) => FinalAnswer::Marked(body.to_string()),
            None => FinalAnswer::Unmarked(response.trim().to_string()),
        }
    }

    /// The answer text, whichever way it was obtained.
    pub fn text(&self) -> &str {
        match self {
            FinalAnswer::Marked(s) | FinalAnswer::Unmarked(s) => s,
        }
    }

    /// Whether the response honoured the marker contract.
    pub fn is_marked(&self) -> bool {
        matches!(self, FinalAnswer::Marked(_))
    }

    pub fn into_text(self) -> String {
        match self {
            FinalAnswer::Marked(s) | FinalAnswer::Unmarked(s) => s,
        }
    }
}

impl fmt::Display for FinalAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Extract the final answer, falling back to the trimmed response.
pub fn extract_final_answer(response: &str) -> String {
    FinalAnswer::parse(response).into_text()
}

fn find_marked_body(response: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with the original text.
    let lowered = response.to_ascii_lowercase();
    let marker = FINAL_ANSWER_MARKER.to_ascii_lowercase();

    let start = lowered.rfind(&marker)? + marker.len();
    let rest = &response[start..];
    let line = rest.split(['\n', '\r']).next().unwrap_or_default();
    let body = line.trim();

    (!body.is_empty()).then_some(body)
}
