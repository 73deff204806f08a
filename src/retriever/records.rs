//! Question/answer records loaded from a JSONL file.

use crate::error::{Result, SvarError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, instrument};

/// One benchmark question with its reference answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique task identifier.
    pub task_id: String,
    /// Question text.
    #[serde(rename = "Question")]
    pub question: String,
    /// Reference answer.
    #[serde(rename = "Final answer")]
    pub answer: String,
    /// Attachment shipped with the question, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Record {
    /// Text indexed for retrieval.
    pub fn document_text(&self) -> String {
        format!("{}\n{}", self.question, self.answer)
    }

    /// Text returned to the agent for a match.
    pub fn render(&self) -> String {
        format!("Question: {}\nFinal answer: {}", self.question, self.answer)
    }
}

/// Load records from a JSONL file.
#[instrument(fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|e| {
        SvarError::Records(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let records = parse_records(std::io::BufReader::new(file))?;
    debug!("Loaded {} records", records.len());
    Ok(records)
}

/// Parse JSONL records from a reader.
///
/// Blank lines are skipped. A malformed line or a repeated `task_id` fails the whole load.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(trimmed)
            .map_err(|e| SvarError::Records(format!("line {}: {}", idx + 1, e)))?;

        if !seen.insert(record.task_id.clone()) {
            return Err(SvarError::DuplicateTask(record.task_id));
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{"task_id": "t-1", "Question": "How many studio albums did Mercedes Sosa release between 2000 and 2009?", "Level": 1, "Final answer": "3", "file_name": ""}
{"task_id": "t-2", "Question": "What is the capital of Norway?", "Level": 1, "Final answer": "Oslo"}

{"task_id": "t-3", "Question": "Which element has atomic number 26?", "Final answer": "Iron", "Annotator Metadata": {"Steps": "1"}}
"#;

    #[test]
    fn test_parse_preserves_count_and_ids() {
        let records = parse_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        let ids: Vec<_> = records.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["t-1", "t-2", "t-3"]);
        assert_eq!(records[1].answer, "Oslo");
        assert_eq!(records[0].file_name.as_deref(), Some(""));
        assert_eq!(records[2].file_name, None);
    }

    #[test]
    fn test_duplicate_task_id_rejected() {
        let input = r#"{"task_id": "a", "Question": "q1", "Final answer": "1"}
{"task_id": "a", "Question": "q2", "Final answer": "2"}"#;
        match parse_records(input.as_bytes()) {
            Err(SvarError::DuplicateTask(id)) => assert_eq!(id, "a"),
            other => panic!("Expected duplicate task error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = r#"{"task_id": "a", "Question": "q1", "Final answer": "1"}
{"task_id": "b", "Question": "q2"}"#;
        let err = parse_records(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = load_records(Path::new("/nonexistent/metadata.jsonl")).unwrap_err();
        assert!(matches!(err, SvarError::Records(_)));
    }
}
