//! BM25 lexical index.
//!
//! Built once from a fixed document set. There is no API for adding or
//! removing documents after construction.

use std::collections::{HashMap, HashSet};

/// Default term frequency saturation.
pub const DEFAULT_K1: f32 = 1.2;
/// Default length normalization.
pub const DEFAULT_B: f32 = 0.75;

/// Read-only BM25 index over documents addressed by position.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    /// Per-document term frequencies.
    term_freqs: Vec<HashMap<String, usize>>,
    /// Per-document token counts.
    doc_lengths: Vec<usize>,
    /// Term -> positions of documents containing it.
    postings: HashMap<String, Vec<usize>>,
    avg_doc_length: f32,
    k1: f32,
    b: f32,
}

impl Bm25Index {
    /// Build an index with default parameters.
    pub fn build<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with_params(documents, DEFAULT_K1, DEFAULT_B)
    }

    /// Build an index with custom BM25 parameters.
    pub fn build_with_params<I, S>(documents: I, k1: f32, b: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut term_freqs = Vec::new();
        let mut doc_lengths = Vec::new();
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, doc) in documents.into_iter().enumerate() {
            let tokens = tokenize(doc.as_ref());
            let mut tf: HashMap<String, usize> = HashMap::new();
            for token in &tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                postings.entry(term.clone()).or_default().push(pos);
            }
            doc_lengths.push(tokens.len());
            term_freqs.push(tf);
        }

        let total: usize = doc_lengths.iter().sum();
        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            total as f32 / doc_lengths.len() as f32
        };

        Self {
            term_freqs,
            doc_lengths,
            postings,
            avg_doc_length,
            k1,
            b,
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    fn idf(&self, term: &str) -> f32 {
        let df = self.postings.get(term).map(|p| p.len()).unwrap_or(0) as f32;
        let n = self.len() as f32;
        if df == 0.0 || n == 0.0 {
            return 0.0;
        }
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn score_document(&self, pos: usize, query_terms: &[String]) -> f32 {
        let tf_map = &self.term_freqs[pos];
        let doc_len = self.doc_lengths[pos] as f32;
        let avg = if self.avg_doc_length > 0.0 { self.avg_doc_length } else { 1.0 };

        query_terms
            .iter()
            .map(|term| {
                let tf = tf_map.get(term).copied().unwrap_or(0) as f32;
                if tf == 0.0 {
                    return 0.0;
                }
                let numerator = tf * (self.k1 + 1.0);
                let denominator = tf + self.k1 * (1.0 - self.b + self.b * doc_len / avg);
                self.idf(term) * numerator / denominator
            })
            .sum()
    }

    /// Return up to `top_k` `(position, score)` pairs with a positive score,
    /// highest first.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<(usize, f32)> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let candidates: HashSet<usize> = query_terms
            .iter()
            .filter_map(|t| self.postings.get(t))
            .flatten()
            .copied()
            .collect();

        let mut results: Vec<(usize, f32)> = candidates
            .into_iter()
            .map(|pos| (pos, self.score_document(pos, &query_terms)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Position as secondary key keeps equal scores in load order.
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        results.truncate(top_k);
        results
    }
}

/// Tokenize text into lowercase terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() > 1)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("What's the 2nd-largest city, e.g. Bergen?"),
            vec!["what", "the", "2nd", "largest", "city", "bergen"]
        );
    }

    #[test]
    fn test_search_ranks_matching_document_first() {
        let index = Bm25Index::build([
            "the quick brown fox",
            "rust ownership and borrowing",
            "borrowing books from the library",
        ]);
        let results = index.search("rust borrowing", 3);
        assert_eq!(results[0].0, 1);
        assert_eq!(results.len(), 2);
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_no_shared_terms() {
        let index = Bm25Index::build(["alpha beta", "gamma delta"]);
        assert!(index.search("epsilon zeta", 3).is_empty());
        assert!(index.search("", 3).is_empty());
    }

    #[test]
    fn test_top_k_truncates() {
        let index = Bm25Index::build(["apple one", "apple two", "apple three", "apple four"]);
        assert_eq!(index.search("apple", 3).len(), 3);
        assert!(index.search("apple", 0).is_empty());
    }

    #[test]
    fn test_length_normalization_prefers_shorter_document() {
        let index = Bm25Index::build([
            "penguin colony antarctica research station weather ice shelf survey",
            "penguin colony",
        ]);
        let results = index.search("penguin", 2);
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn test_empty_index() {
        let index = Bm25Index::build(Vec::<String>::new());
        assert!(index.is_empty());
        assert!(index.search("anything", 3).is_empty());
    }
}
