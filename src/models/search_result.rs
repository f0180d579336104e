// file: src/models/search_result.rs
// description: Retrieved corpus chunk with similarity score
// reference: Used for vector similarity search results

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Position of the chunk in the index and the metadata list
    pub row_id: usize,

    pub city: Option<String>,

    /// Corpus file the chunk came from, relative to the corpus root
    pub source: String,

    pub chunk_id: usize,

    pub text: String,

    /// Cosine similarity (higher is more similar, 1.0 at most)
    pub score: f32,

    /// Raw distance reported by the index (lower is more similar)
    pub distance: Option<f32>,
}

impl RetrievedDocument {
    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = crate::utils::Validator::truncate_text(&self.text, max_content_len);

        format!(
            "Score: {:.4} | {} ({})\n{}\n",
            self.score,
            self.source,
            self.city.as_deref().unwrap_or("no city"),
            content_preview
        )
    }
}
