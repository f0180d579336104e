// file: src/corpus/chunker.rs
// description: overlapping fixed-size windows over corpus text
// reference: internal chunking rules

use crate::config::{ChunkUnit, RetrievalConfig};
use crate::error::{AdvisorError, Result};
use crate::models::{DocumentChunk, SourceDocument};

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    size: usize,
    overlap: usize,
    unit: ChunkUnit,
}

impl Chunker {
    pub fn new(size: usize, overlap: usize, unit: ChunkUnit) -> Result<Self> {
        if size == 0 {
            return Err(AdvisorError::Validation(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        if overlap >= size {
            return Err(AdvisorError::Validation(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, size
            )));
        }
        Ok(Self {
            size,
            overlap,
            unit,
        })
    }

    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap, config.chunk_unit)
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn unit(&self) -> ChunkUnit {
        self.unit
    }

    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        match self.unit {
            ChunkUnit::Chars => {
                let chars: Vec<char> = text.chars().collect();
                self.windows(chars.len())
                    .into_iter()
                    .map(|(start, end)| chars[start..end].iter().collect())
                    .collect()
            }
            ChunkUnit::Words => {
                let words: Vec<&str> = text.split_whitespace().collect();
                self.windows(words.len())
                    .into_iter()
                    .map(|(start, end)| words[start..end].join(" "))
                    .collect()
            }
        }
    }

    pub fn chunk_document(&self, document: &SourceDocument) -> Vec<DocumentChunk> {
        self.chunk_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(chunk_id, text)| DocumentChunk::new(document, chunk_id, text))
            .collect()
    }

    /// `[start, end)` unit ranges. The window reaching `len` is the last one.
    fn windows(&self, len: usize) -> Vec<(usize, usize)> {
        let step = self.size - self.overlap;
        let mut ranges = Vec::new();
        let mut start = 0;

        while start < len {
            let end = (start + self.size).min(len);
            ranges.push((start, end));
            if end == len {
                break;
            }
            start += step;
        }

        ranges
    }
}
