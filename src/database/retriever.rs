// file: src/database/retriever.rs
// description: city-filtered top-k retrieval over the chunk index
// reference: https://docs.rs/lancedb

use crate::catalog;
use crate::config::{CityMatch, RetrievalConfig};
use crate::database::client::LanceDbClient;
use crate::database::embeddings::EmbeddingClient;
use crate::error::Result;
use crate::exporter::JsonExporter;
use crate::models::{DocumentChunk, IndexManifest, RetrievedDocument};
use crate::utils::HealthCheck;
use serde::Serialize;
use tracing::{debug, info, warn};

pub struct Retriever {
    config: RetrievalConfig,
    embeddings: EmbeddingClient,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub vector_count: usize,
    pub metadata_count: usize,
    /// (city, documents matching it among the over-fetched neighbours)
    pub city_hits: Vec<(String, usize)>,
}

impl IndexReport {
    pub fn is_consistent(&self) -> bool {
        self.vector_count == self.metadata_count && self.vector_count > 0
    }

    pub fn to_health_check(&self) -> HealthCheck {
        let coverage = self
            .city_hits
            .iter()
            .map(|(city, hits)| format!("{}: {}", city, hits))
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!(
            "{} vectors, {} metadata entries ({})",
            self.vector_count, self.metadata_count, coverage
        );

        if self.is_consistent() {
            HealthCheck::healthy_with("similarity_index", message)
        } else {
            HealthCheck::degraded("similarity_index", message)
        }
    }
}

impl Retriever {
    pub fn new(config: RetrievalConfig, embeddings: EmbeddingClient) -> Self {
        Self { config, embeddings }
    }

    pub fn default_k(&self) -> usize {
        self.config.top_k
    }

    /// At most `k` chunks ordered by similarity. A missing index, metadata
    /// or manifest file, an index built by another encoder, or a failed query
    /// embedding yields an empty list.
    pub async fn retrieve(
        &self,
        query: &str,
        city: Option<&str>,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let Some((client, metadata)) = self.open_index().await? else {
            return Ok(Vec::new());
        };
        if metadata.is_empty() {
            return Ok(Vec::new());
        }

        let fetch = (k * self.config.overfetch_factor.max(1)).min(metadata.len());
        let query_embedding = match self.embeddings.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Query embedding failed; returning no documents: {}", e);
                return Ok(Vec::new());
            }
        };
        let hits = client.vector_search(query_embedding, fetch).await?;

        let mut results = Vec::with_capacity(k);
        for hit in hits {
            let Some(chunk) = metadata.get(hit.row_id) else {
                debug!("Skipping hit with out-of-range row {}", hit.row_id);
                continue;
            };

            if let Some(city) = city
                && !city_matches(chunk.city.as_deref(), city, self.config.city_match)
            {
                continue;
            }

            results.push(RetrievedDocument {
                row_id: hit.row_id,
                city: chunk.city.clone(),
                source: chunk.source.clone(),
                chunk_id: chunk.chunk_id,
                text: chunk.text.clone(),
                score: hit.score(),
                distance: hit.distance,
            });

            if results.len() == k {
                break;
            }
        }

        info!(
            "Retrieved {} documents for city {:?} (fetched {})",
            results.len(),
            city,
            fetch
        );
        Ok(results)
    }

    pub async fn retrieve_for_city(&self, city: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        self.retrieve(&city_query(city), Some(city), k).await
    }

    /// Vector count against metadata length, plus per-city coverage of
    /// partial matches among the over-fetched neighbours.
    pub async fn check(&self) -> Result<IndexReport> {
        let Some((client, metadata)) = self.open_index().await? else {
            return Ok(IndexReport {
                vector_count: 0,
                metadata_count: 0,
                city_hits: Vec::new(),
            });
        };

        let vector_count = client.count_rows().await?;
        if vector_count != metadata.len() {
            warn!(
                "Index has {} vectors but metadata has {} entries",
                vector_count,
                metadata.len()
            );
        }

        let fetch = (self.config.top_k * self.config.overfetch_factor.max(1)).min(metadata.len());
        let mut city_hits = Vec::new();

        for city in catalog::supported_cities() {
            let hits = if fetch == 0 {
                0
            } else {
                let query_embedding = self.embeddings.embed(&city_query(city)).await?;
                client
                    .vector_search(query_embedding, fetch)
                    .await?
                    .iter()
                    .filter_map(|hit| metadata.get(hit.row_id))
                    .filter(|chunk| city_matches(chunk.city.as_deref(), city, CityMatch::Partial))
                    .count()
            };
            debug!("{}: {} matching documents", city, hits);
            city_hits.push((city.to_string(), hits));
        }

        Ok(IndexReport {
            vector_count,
            metadata_count: metadata.len(),
            city_hits,
        })
    }

    async fn open_index(&self) -> Result<Option<(LanceDbClient, Vec<DocumentChunk>)>> {
        if !self.config.index_uri.exists() {
            warn!(
                "Similarity index not found at {}; returning no documents",
                self.config.index_uri.display()
            );
            return Ok(None);
        }

        let Some(metadata) =
            JsonExporter::read_optional::<Vec<DocumentChunk>>(&self.config.metadata_path)?
        else {
            warn!(
                "Index metadata not found at {}; returning no documents",
                self.config.metadata_path.display()
            );
            return Ok(None);
        };

        // Written last by the index builder, so its absence marks an
        // interrupted rebuild.
        let Some(manifest) =
            JsonExporter::read_optional::<IndexManifest>(&self.config.manifest_path)?
        else {
            warn!(
                "Index manifest not found at {}; returning no documents",
                self.config.manifest_path.display()
            );
            return Ok(None);
        };

        if let Some(reason) = encoder_mismatch(
            &manifest,
            &self.embeddings.model_name(),
            self.embeddings.dimension(),
        ) {
            warn!("{}; returning no documents", reason);
            return Ok(None);
        }

        let client = LanceDbClient::new(&self.config.index_uri, &self.config.table_name).await?;
        if !client.table_exists().await? {
            warn!(
                "Table '{}' does not exist; returning no documents",
                self.config.table_name
            );
            return Ok(None);
        }

        Ok(Some((client, metadata)))
    }
}

/// Queries must be encoded the way the index was built.
pub fn encoder_mismatch(manifest: &IndexManifest, model: &str, dimension: usize) -> Option<String> {
    if manifest.embedding_model == model && manifest.dimension == dimension {
        return None;
    }

    Some(format!(
        "Index was built with {} ({} dims) but queries use {} ({} dims)",
        manifest.embedding_model, manifest.dimension, model, dimension
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_matches_exact() {
        assert!(city_matches(Some("Pune"), "pune", CityMatch::Exact));
        assert!(!city_matches(Some("Pune East"), "Pune", CityMatch::Exact));
        assert!(!city_matches(None, "Pune", CityMatch::Exact));
    }

    #[test]
    fn test_city_matches_partial() {
        assert!(city_matches(Some("Pune East"), "pune", CityMatch::Partial));
        assert!(!city_matches(Some("Bengaluru"), "Pune", CityMatch::Partial));
        assert!(!city_matches(None, "Pune", CityMatch::Partial));
    }

    #[test]
    fn test_city_query() {
        assert_eq!(city_query("Pune"), "Pune real estate infrastructure growth");
    }

    #[test]
    fn test_encoder_mismatch() {
        let manifest = IndexManifest {
            embedding_model: "hashing-64".to_string(),
            dimension: 64,
            chunk_count: 12,
            document_count: 3,
            built_at: chrono::Utc::now(),
        };

        assert_eq!(encoder_mismatch(&manifest, "hashing-64", 64), None);
        assert!(encoder_mismatch(&manifest, "hashing-32", 32).is_some());
        assert!(
            encoder_mismatch(&manifest, "text-embedding-3-small", 64)
                .unwrap()
                .contains("text-embedding-3-small")
        );
    }

    #[test]
    fn test_report_consistency() {
        let report = IndexReport {
            vector_count: 10,
            metadata_count: 9,
            city_hits: vec![("Pune".to_string(), 4)],
        };
        assert!(!report.is_consistent());
        assert!(report.to_health_check().message.unwrap().contains("Pune: 4"));
    }
}
