// file: src/pipeline/indexer.rs
// description: scan, chunk, embed and store the market corpus
// reference: batch build of the similarity index

use crate::config::Config;
use crate::corpus::{Chunker, CorpusScanner};
use crate::database::{ChunkInserter, EmbeddingClient, LanceDbClient};
use crate::error::{AdvisorError, Result};
use crate::exporter::JsonExporter;
use crate::models::{DocumentChunk, IndexManifest};
use crate::pipeline::progress::{IndexStats, ProgressTracker};
use crate::utils::OperationTimer;
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

const EMBEDDING_BATCH: usize = 64;

pub struct IndexBuilder {
    config: Config,
    embeddings: EmbeddingClient,
    show_progress: bool,
    colored: bool,
}

impl IndexBuilder {
    pub fn new(config: Config) -> Self {
        let embeddings = EmbeddingClient::new(config.embeddings.clone());
        Self {
            config,
            embeddings,
            show_progress: false,
            colored: false,
        }
    }

    pub fn with_progress(mut self, colored: bool) -> Self {
        self.show_progress = true;
        self.colored = colored;
        self
    }

    /// Rebuilds every derived artifact: the LanceDB table, then the chunk
    /// file and metadata, then the manifest. Nothing is written when the
    /// corpus is empty or embedding fails.
    pub async fn build(&self) -> Result<IndexStats> {
        let timer = OperationTimer::new("build similarity index");
        let data = &self.config.data;
        let retrieval = &self.config.retrieval;

        let chunker = Chunker::from_config(retrieval)?;
        let documents = CorpusScanner::new().scan_directory(&data.corpus_dir)?;
        if documents.is_empty() {
            return Err(AdvisorError::Validation(format!(
                "No .txt or .md documents found under {}",
                data.corpus_dir.display()
            )));
        }

        let tracker = if self.show_progress {
            ProgressTracker::with_color(documents.len(), self.colored)
        } else {
            ProgressTracker::hidden()
        };

        let mut chunks: Vec<DocumentChunk> = Vec::new();
        for document in &documents {
            tracker.set_message(document.source.clone());
            let doc_chunks = chunker.chunk_document(document);
            if doc_chunks.is_empty() {
                tracker.inc_skipped();
                continue;
            }
            debug!("{}: {} chunks", document.source, doc_chunks.len());
            tracker.inc_document(doc_chunks.len());
            chunks.extend(doc_chunks);
        }
        tracker.finish();
        timer.checkpoint(&format!("{} chunks from {} documents", chunks.len(), documents.len()));

        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBEDDING_BATCH) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            embeddings.extend(self.embeddings.embed_batch(&texts).await?);
        }

        // Retrieval refuses an index without a manifest, so withdrawing it
        // first keeps a failed rebuild from pairing new rows with old metadata.
        remove_if_exists(&retrieval.manifest_path)?;

        let client = LanceDbClient::new(&retrieval.index_uri, &retrieval.table_name).await?;
        let insert = ChunkInserter::new(&client)
            .rebuild(&chunks, &embeddings, self.embeddings.dimension())
            .await?;

        JsonExporter::write(&data.chunks_path, &chunks, true)?;
        JsonExporter::write(&retrieval.metadata_path, &chunks, false)?;

        let manifest = IndexManifest {
            embedding_model: self.embeddings.model_name(),
            dimension: self.embeddings.dimension(),
            chunk_count: chunks.len(),
            document_count: documents.len(),
            built_at: Utc::now(),
        };
        JsonExporter::write(&retrieval.manifest_path, &manifest, true)?;

        let stats = tracker.get_stats(self.embeddings.dimension());
        info!(
            "Index ready: {} chunks from {} documents ({} table {})",
            insert.rows_inserted,
            stats.documents_indexed,
            if insert.replaced_existing { "replaced" } else { "created" },
            client.table_name()
        );
        timer.finish_with_count(chunks.len(), "chunks");

        Ok(stats)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AdvisorError::file(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingProvider;
    use crate::database::Retriever;
    use tempfile::TempDir;

    fn temp_config(temp: &TempDir) -> Config {
        let mut config = Config::default_config();
        config.data.corpus_dir = temp.path().join("corpus");
        config.data.chunks_path = temp.path().join("processed/text_chunks.json");
        config.retrieval.index_uri = temp.path().join("vector_store/lancedb");
        config.retrieval.metadata_path = temp.path().join("vector_store/metadata.json");
        config.retrieval.manifest_path = temp.path().join("vector_store/manifest.json");
        config.retrieval.chunk_size = 40;
        config.retrieval.chunk_overlap = 10;
        config.embeddings.dimension = 32;
        config
    }

    #[tokio::test]
    async fn test_build_writes_all_artifacts() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        let city_dir = config.data.corpus_dir.join("Pune");
        fs::create_dir_all(&city_dir).unwrap();
        fs::write(
            city_dir.join("baner_market_update_2024.txt"),
            "Baner prices rose steadily in 2024 as IT hiring expanded nearby.",
        )
        .unwrap();

        let stats = IndexBuilder::new(config.clone()).build().await.unwrap();
        assert_eq!(stats.documents_indexed, 1);
        assert!(stats.chunks_created >= 2);

        let metadata: Vec<DocumentChunk> =
            JsonExporter::read(&config.retrieval.metadata_path).unwrap();
        assert_eq!(metadata.len(), stats.chunks_created);

        let manifest: IndexManifest = JsonExporter::read(&config.retrieval.manifest_path).unwrap();
        assert_eq!(manifest.dimension, 32);
        assert_eq!(manifest.embedding_model, "hashing-32");
        assert!(config.data.chunks_path.exists());

        let client = LanceDbClient::new(&config.retrieval.index_uri, "chunks").await.unwrap();
        assert_eq!(client.count_rows().await.unwrap(), stats.chunks_created);
    }

    #[tokio::test]
    async fn test_empty_corpus_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        fs::create_dir_all(&config.data.corpus_dir).unwrap();

        let result = IndexBuilder::new(config.clone()).build().await;
        assert!(matches!(result, Err(AdvisorError::Validation(_))));
        assert!(!config.retrieval.metadata_path.exists());
        assert!(!config.retrieval.index_uri.exists());
    }

    fn write_doc(config: &Config, city: &str, name: &str, text: &str) {
        let city_dir = config.data.corpus_dir.join(city);
        fs::create_dir_all(&city_dir).unwrap();
        fs::write(city_dir.join(name), text).unwrap();
    }

    #[tokio::test]
    async fn test_failed_rebuild_never_serves_stale_metadata() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        write_doc(
            &config,
            "Pune",
            "baner_market_update_2024.txt",
            "Baner prices rose steadily in 2024 as IT hiring expanded nearby.",
        );
        IndexBuilder::new(config.clone()).build().await.unwrap();

        write_doc(
            &config,
            "Hyderabad",
            "gachibowli_rent_demand_2024.txt",
            "Gachibowli rents climbed as new offices opened along the corridor.",
        );

        // The chunk file cannot be written once its parent is a plain file.
        let blocker = temp.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();
        let mut failing = config.clone();
        failing.data.chunks_path = blocker.join("text_chunks.json");

        assert!(IndexBuilder::new(failing).build().await.is_err());
        assert!(!config.retrieval.manifest_path.exists());

        let retriever = Retriever::new(
            config.retrieval.clone(),
            EmbeddingClient::new(config.embeddings.clone()),
        );
        let results = retriever.retrieve("Baner prices", None, 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_keeps_previous_index() {
        let temp = TempDir::new().unwrap();
        let config = temp_config(&temp);
        write_doc(
            &config,
            "Pune",
            "wakad_rent_demand_2024.txt",
            "Wakad rental demand is steady thanks to the Hinjewadi IT park.",
        );
        let stats = IndexBuilder::new(config.clone()).build().await.unwrap();
        let manifest_before: IndexManifest =
            JsonExporter::read(&config.retrieval.manifest_path).unwrap();

        let mut remote = config.clone();
        remote.embeddings.provider = EmbeddingProvider::OpenAi;
        remote.embeddings.base_url = "http://127.0.0.1:9".to_string();
        remote.embeddings.api_key = Some("test-key".to_string());

        let result = IndexBuilder::new(remote).build().await;
        assert!(matches!(result, Err(AdvisorError::Embedding(_))));

        let manifest_after: IndexManifest =
            JsonExporter::read(&config.retrieval.manifest_path).unwrap();
        assert_eq!(manifest_after, manifest_before);

        let metadata: Vec<DocumentChunk> =
            JsonExporter::read(&config.retrieval.metadata_path).unwrap();
        assert_eq!(metadata.len(), stats.chunks_created);
    }
}
