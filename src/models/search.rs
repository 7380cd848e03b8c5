use serde::{Deserialize, Serialize};

/// External document identifier
pub type DocumentId = u64;

/// Search result with relevance score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: DocumentId,
    pub score: f32,
}

impl SearchResult {
    pub fn new(doc_id: DocumentId, score: f32) -> Self {
        Self { doc_id, score }
    }
}
