// file: src/database/schema.rs
// description: arrow schema and record batches for the chunk similarity table
// reference: https://docs.rs/lancedb

use crate::error::{AdvisorError, Result};
use crate::models::DocumentChunk;
use arrow_array::builder::{FixedSizeListBuilder, Float32Builder};
use arrow_array::{ArrayRef, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const EMBEDDING_COLUMN: &str = "embedding";
pub const ROW_ID_COLUMN: &str = "row_id";

pub struct ChunkSchema;

impl ChunkSchema {
    pub fn schema(embedding_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            // position in the metadata list
            Field::new(ROW_ID_COLUMN, DataType::UInt64, false),
            Field::new("id", DataType::Utf8, false),
            Field::new("city", DataType::Utf8, true),
            Field::new("source", DataType::Utf8, false),
            Field::new("chunk_id", DataType::UInt64, false),
            Field::new("text", DataType::Utf8, false),
            Field::new(
                EMBEDDING_COLUMN,
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                false,
            ),
        ]))
    }

    /// Row `i` of the batch is `chunks[i]` with `row_id = i`.
    pub fn record_batch(
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
        embedding_dim: usize,
    ) -> Result<RecordBatch> {
        if chunks.len() != embeddings.len() {
            return Err(AdvisorError::Database(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let row_ids: UInt64Array = (0..chunks.len() as u64).map(Some).collect();
        let ids: StringArray = chunks.iter().map(|c| Some(c.id.as_str())).collect();
        let cities: StringArray = chunks.iter().map(|c| c.city.as_deref()).collect();
        let sources: StringArray = chunks.iter().map(|c| Some(c.source.as_str())).collect();
        let chunk_ids: UInt64Array = chunks.iter().map(|c| Some(c.chunk_id as u64)).collect();
        let texts: StringArray = chunks.iter().map(|c| Some(c.text.as_str())).collect();

        let mut embedding_builder = FixedSizeListBuilder::new(
            Float32Builder::with_capacity(embedding_dim * embeddings.len()),
            embedding_dim as i32,
        );
        for embedding in embeddings {
            if embedding.len() != embedding_dim {
                return Err(AdvisorError::Database(format!(
                    "Embedding has dimension {}, expected {}",
                    embedding.len(),
                    embedding_dim
                )));
            }
            embedding_builder.values().append_slice(embedding);
            embedding_builder.append(true);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(row_ids),
            Arc::new(ids),
            Arc::new(cities),
            Arc::new(sources),
            Arc::new(chunk_ids),
            Arc::new(texts),
            Arc::new(embedding_builder.finish()),
        ];

        RecordBatch::try_new(Self::schema(embedding_dim), columns)
            .map_err(|e| AdvisorError::Database(format!("Failed to create record batch: {}", e)))
    }
}
