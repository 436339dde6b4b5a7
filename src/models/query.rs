// file: src/models/query.rs
// description: question request, answer and cited source chunk models
// reference: POST /query

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
    pub top_k: u32,
}

impl QueryRequest {
    pub fn new(question: &str, top_k: u32) -> Self {
        Self {
            question: question.to_string(),
            top_k,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceChunk {
    pub document_id: String,
    pub chunk_index: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResult {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceChunk>,
}

impl QueryResult {
    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}
