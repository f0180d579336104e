// file: src/database/client.rs
// description: LanceDB client wrapper for the chunk similarity table
// reference: https://docs.rs/lancedb

use crate::database::schema::{EMBEDDING_COLUMN, ROW_ID_COLUMN};
use crate::error::{AdvisorError, Result};
use arrow_array::{Float32Array, RecordBatch, RecordBatchIterator, UInt64Array};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use std::path::Path;
use tracing::{debug, info};

/// Nearest-neighbour hit. `distance` is squared L2 over unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub row_id: usize,
    pub distance: Option<f32>,
}

impl IndexHit {
    /// Cosine similarity recovered from the squared L2 distance of unit vectors.
    pub fn score(&self) -> f32 {
        match self.distance {
            Some(distance) => 1.0 - distance / 2.0,
            None => 0.0,
        }
    }
}

#[derive(Clone)]
pub struct LanceDbClient {
    connection: Connection,
    table_name: String,
}

impl LanceDbClient {
    pub async fn new(uri: &Path, table_name: &str) -> Result<Self> {
        let uri = uri.to_string_lossy();
        info!("Connecting to LanceDB at {}", uri);

        let connection = connect(&uri)
            .execute()
            .await
            .map_err(|e| AdvisorError::Database(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self {
            connection,
            table_name: table_name.to_string(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn table_exists(&self) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| AdvisorError::Database(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == &self.table_name))
    }

    pub async fn get_table(&self) -> Result<Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                AdvisorError::Database(format!("Failed to open table {}: {}", self.table_name, e))
            })
    }

    pub async fn count_rows(&self) -> Result<usize> {
        if !self.table_exists().await? {
            return Ok(0);
        }

        self.get_table()
            .await?
            .count_rows(None)
            .await
            .map_err(|e| AdvisorError::Database(format!("Failed to count rows: {}", e)))
    }

    pub async fn drop_table_if_exists(&self) -> Result<bool> {
        if !self.table_exists().await? {
            return Ok(false);
        }

        self.connection
            .drop_table(&self.table_name)
            .await
            .map_err(|e| {
                AdvisorError::Database(format!("Failed to drop table {}: {}", self.table_name, e))
            })?;
        info!("Dropped table: {}", self.table_name);
        Ok(true)
    }

    pub async fn create_table(&self, batch: RecordBatch) -> Result<()> {
        let schema = batch.schema();
        self.connection
            .create_table(
                &self.table_name,
                RecordBatchIterator::new(vec![Ok(batch)], schema),
            )
            .execute()
            .await
            .map_err(|e| AdvisorError::Database(format!("Failed to create table: {}", e)))?;

        info!("Created table: {}", self.table_name);
        Ok(())
    }

    /// Nearest rows to `query_embedding`, closest first.
    pub async fn vector_search(
        &self,
        query_embedding: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<IndexHit>> {
        let table = self.get_table().await?;

        debug!("Performing vector search with limit {}", limit);

        let mut results_stream = table
            .vector_search(query_embedding)
            .map_err(|e| AdvisorError::Database(format!("Failed to create vector search: {}", e)))?
            .column(EMBEDDING_COLUMN)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| AdvisorError::Database(format!("Vector search failed: {}", e)))?;

        let mut hits = Vec::new();

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result.map_err(|e| {
                AdvisorError::Database(format!("Failed to read result batch: {}", e))
            })?;

            let row_ids = batch
                .column_by_name(ROW_ID_COLUMN)
                .ok_or_else(|| AdvisorError::Database("Missing 'row_id' column".to_string()))?
                .as_any()
                .downcast_ref::<UInt64Array>()
                .ok_or_else(|| {
                    AdvisorError::Database("Invalid 'row_id' column type".to_string())
                })?;

            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

            for i in 0..batch.num_rows() {
                hits.push(IndexHit {
                    row_id: row_ids.value(i) as usize,
                    distance: distances.map(|d| d.value(i)),
                });
            }
        }

        hits.sort_by(|a, b| {
            a.distance
                .unwrap_or(f32::MAX)
                .total_cmp(&b.distance.unwrap_or(f32::MAX))
        });

        debug!("Vector search returned {} hits", hits.len());
        Ok(hits)
    }
}
