//! Term frequency / inverse document frequency over a small in-memory corpus.
//!
//! idf(t) = 1 + ln(N / (1 + df(t))), tf is the raw count. With a single
//! document every term shares the same idf, so ranking reduces to frequency.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resume::tokenizer::tokenize;
use crate::resume::vocabulary::STOP_WORDS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Term counts for one document, keeping first-seen order for stable ties.
#[derive(Debug, Default)]
struct TermCounts {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl TermCounts {
    fn add(&mut self, term: String) {
        match self.counts.get_mut(&term) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(term.clone(), 1);
                self.order.push(term);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TfIdf {
    documents: Vec<TermCounts>,
}

impl TfIdf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizes `text` (lowercased, stop words removed) and adds it as a document.
    pub fn add_document(&mut self, text: &str) {
        let mut doc = TermCounts::default();
        for token in tokenize(&text.to_lowercase()) {
            if !STOP_WORDS.contains(token.as_str()) {
                doc.add(token);
            }
        }
        self.documents.push(doc);
    }

    pub fn idf(&self, term: &str) -> f64 {
        let with_term = self
            .documents
            .iter()
            .filter(|doc| doc.counts.contains_key(term))
            .count();
        1.0 + (self.documents.len() as f64 / (1.0 + with_term as f64)).ln()
    }

    pub fn tfidf(&self, term: &str, doc_index: usize) -> f64 {
        let tf = self
            .documents
            .get(doc_index)
            .and_then(|doc| doc.counts.get(term))
            .copied()
            .unwrap_or(0);
        tf as f64 * self.idf(term)
    }

    /// All terms of one document, highest score first.
    pub fn list_terms(&self, doc_index: usize) -> Vec<TermScore> {
        let Some(doc) = self.documents.get(doc_index) else {
            return Vec::new();
        };

        let mut terms: Vec<TermScore> = doc
            .order
            .iter()
            .map(|term| TermScore {
                term: term.clone(),
                score: self.tfidf(term, doc_index),
            })
            .collect();
        terms.sort_by(|a, b| b.score.total_cmp(&a.score));
        terms
    }
}
