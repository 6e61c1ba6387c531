//! Resume Analyzer: text extraction, skill/role/seniority inference and keyword ranking.

pub mod analyzer;
pub mod extract;
pub mod tfidf;
pub mod tokenizer;
pub mod vocabulary;
