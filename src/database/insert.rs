// file: src/database/insert.rs
// description: wholesale rebuild of the chunk similarity table
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::database::schema::ChunkSchema;
use crate::error::{AdvisorError, Result};
use crate::models::DocumentChunk;
use tracing::info;

pub struct ChunkInserter<'a> {
    client: &'a LanceDbClient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertStats {
    pub rows_inserted: usize,
    pub replaced_existing: bool,
}

impl<'a> ChunkInserter<'a> {
    pub fn new(client: &'a LanceDbClient) -> Self {
        Self { client }
    }

    /// Drops the table and recreates it so row `i` is `chunks[i]`.
    pub async fn rebuild(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
        embedding_dim: usize,
    ) -> Result<InsertStats> {
        if chunks.is_empty() {
            return Err(AdvisorError::Validation(
                "No chunks to index".to_string(),
            ));
        }

        let batch = ChunkSchema::record_batch(chunks, embeddings, embedding_dim)?;

        let replaced_existing = self.client.drop_table_if_exists().await?;
        self.client.create_table(batch).await?;

        info!(
            "Indexed {} chunks into table {}",
            chunks.len(),
            self.client.table_name()
        );

        Ok(InsertStats {
            rows_inserted: chunks.len(),
            replaced_existing,
        })
    }
}
