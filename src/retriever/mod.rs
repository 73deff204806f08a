//! Keyword answer retriever.
//!
//! Holds the question/answer records loaded at startup together with a BM25
//! index built over exactly those records. The store is constructed once
//! and shared read-only with whoever needs lookups.

mod bm25;
mod records;

pub use bm25::{tokenize, Bm25Index, DEFAULT_B, DEFAULT_K1};
pub use records::{load_records, parse_records, Record};

use crate::config::RetrieverSettings;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, info};

/// Returned by [`AnswerStore::lookup`] when no record shares a term with the query.
pub const NO_MATCH: &str = "No matching answers found.";

/// Default number of records returned by a lookup.
pub const DEFAULT_TOP_K: usize = 3;

/// A record matched by a query.
#[derive(Debug, Clone)]
pub struct RetrievalHit<'a> {
    /// The matched record.
    pub record: &'a Record,
    /// BM25 score (higher is better).
    pub score: f32,
}

/// Immutable record set plus its index.
#[derive(Debug)]
pub struct AnswerStore {
    records: Vec<Record>,
    index: Bm25Index,
    top_k: usize,
}

impl AnswerStore {
    /// Build a store over the given records with default parameters.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::with_settings(records, &RetrieverSettings::default())
    }

    /// Build a store over the given records.
    pub fn with_settings(records: Vec<Record>, settings: &RetrieverSettings) -> Self {
        let index = Bm25Index::build_with_params(
            records.iter().map(Record::document_text),
            settings.k1,
            settings.b,
        );
        debug!("Indexed {} records", index.len());

        Self {
            records,
            index,
            top_k: settings.top_k,
        }
    }

    /// Load records from a JSONL file and index them.
    pub fn load(path: &Path, settings: &RetrieverSettings) -> Result<Self> {
        let records = load_records(path)?;
        info!("Loaded {} answer records from {}", records.len(), path.display());
        Ok(Self::with_settings(records, settings))
    }

    /// All loaded records, in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find the records best matching a free-text query.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<RetrievalHit<'_>> {
        self.index
            .search(query, top_k)
            .into_iter()
            .map(|(pos, score)| RetrievalHit {
                record: &self.records[pos],
                score,
            })
            .collect()
    }

    /// Concatenated text of the top matches, or [`NO_MATCH`].
    pub fn lookup(&self, query: &str) -> String {
        let hits = self.search(query, self.top_k);
        if hits.is_empty() {
            return NO_MATCH.to_string();
        }

        hits.iter()
            .map(|h| h.record.render())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, question: &str, answer: &str) -> Record {
        Record {
            task_id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            file_name: None,
        }
    }

    fn store() -> AnswerStore {
        AnswerStore::from_records(vec![
            record("1", "What is the capital city of Norway?", "Oslo"),
            record("2", "How many moons does Mars have?", "2"),
            record("3", "Who wrote the novel Hunger published in 1890?", "Knut Hamsun"),
            record("4", "What is the boiling point of water at sea level in Celsius?", "100"),
            record("5", "Which planet has the most moons as of 2023?", "Saturn"),
        ])
    }

    #[test]
    fn test_no_shared_terms_returns_no_match() {
        assert_eq!(store().lookup("zebra xylophone quark"), NO_MATCH);
    }

    #[test]
    fn test_exact_question_appears_in_top_results() {
        let store = store();
        let result = store.lookup("Who wrote the novel Hunger published in 1890?");
        assert!(result.contains("Final answer: Knut Hamsun"), "{}", result);
    }

    #[test]
    fn test_every_exact_question_finds_its_answer() {
        let store = store();
        for r in store.records() {
            let hits = store.search(&r.question, DEFAULT_TOP_K);
            assert!(
                hits.iter().any(|h| h.record.task_id == r.task_id),
                "no hit for {}",
                r.task_id
            );
        }
    }

    #[test]
    fn test_lookup_returns_at_most_three() {
        let result = store().lookup("what is the how many which who");
        assert!(result.matches("Final answer:").count() <= 3);
    }

    #[test]
    fn test_index_matches_record_set() {
        let store = store();
        assert_eq!(store.len(), 5);
        assert_eq!(store.index.len(), store.len());
    }

    #[test]
    fn test_empty_store() {
        let store = AnswerStore::from_records(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.lookup("capital of Norway"), NO_MATCH);
    }
}
