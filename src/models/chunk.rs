// file: src/models/chunk.rs
// description: corpus documents, their indexed chunks and the index manifest
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A loaded corpus file before chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub city: Option<String>,
    pub source: String,
    pub text: String,
}

/// Unit of the similarity index. The metadata list on disk is a
/// `Vec<DocumentChunk>` whose position `i` matches row `i` of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub city: Option<String>,
    pub source: String,
    pub chunk_id: usize,
    pub text: String,
}

impl DocumentChunk {
    pub fn new(document: &SourceDocument, chunk_id: usize, text: String) -> Self {
        let id = Self::compute_id(&document.source, chunk_id, &text);
        Self {
            id,
            city: document.city.clone(),
            source: document.source.clone(),
            chunk_id,
            text,
        }
    }

    fn compute_id(source: &str, chunk_id: usize, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(chunk_id.to_le_bytes());
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub embedding_model: String,
    pub dimension: usize,
    pub chunk_count: usize,
    pub document_count: usize,
    pub built_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> SourceDocument {
        SourceDocument {
            city: Some("Pune".to_string()),
            source: "Pune/baner_rent_demand_2024.txt".to_string(),
            text: "Rental demand in Baner remains high.".to_string(),
        }
    }

    #[test]
    fn test_chunk_inherits_document_metadata() {
        let chunk = DocumentChunk::new(&document(), 0, "Rental demand".to_string());
        assert_eq!(chunk.city.as_deref(), Some("Pune"));
        assert_eq!(chunk.source, "Pune/baner_rent_demand_2024.txt");
        assert_eq!(chunk.id.len(), 64);
    }

    #[test]
    fn test_chunk_id_depends_on_position() {
        let doc = document();
        let first = DocumentChunk::new(&doc, 0, "same".to_string());
        let second = DocumentChunk::new(&doc, 1, "same".to_string());
        assert_ne!(first.id, second.id);
        assert_eq!(first.id, DocumentChunk::new(&doc, 0, "same".to_string()).id);
    }
}
