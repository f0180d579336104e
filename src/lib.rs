// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod advisory;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod database;
pub mod dataset;
pub mod error;
pub mod exporter;
pub mod ml;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod recommender;
pub mod server;
pub mod utils;

pub use advisory::{LlmClient, PdfRenderer, build_llm_prompt};
pub use config::{
    ChunkUnit, CityMatch, Config, DataConfig, EmbeddingConfig, EmbeddingProvider, LlmConfig,
    ModelConfig, ReportConfig, RetrievalConfig, ServerConfig,
};
pub use corpus::{Chunker, CorpusGenerator, CorpusScanner};
pub use database::{ChunkInserter, EmbeddingClient, LanceDbClient, Retriever};
pub use dataset::{DatasetGenerator, load_dataset, write_dataset};
pub use error::{AdvisorError, Result};
pub use exporter::{AdvisoryReport, JsonExporter, ReportWriter};
pub use ml::{PricePredictor, Trainer};
pub use models::{
    AdvisoryInputs, DocumentChunk, PropertyRecord, Recommendation, RetrievedDocument,
    SourceDocument,
};
pub use parser::MarkdownParser;
pub use pipeline::{Advisor, AdvisoryOutcome, IndexBuilder, IndexStats, health_without_advisor};
pub use recommender::{RecommendationQuery, Recommender};
pub use server::{AppState, create_router, start_server};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(catalog::supported_cities().count(), 3);
    }
}
