// file: tests/retrieval_test.rs
// description: end-to-end retrieval over a generated corpus

mod common;

use golden_mile::{
    Advisor, CityMatch, Config, CorpusGenerator, DocumentChunk, EmbeddingClient, HealthStatus,
    IndexBuilder, JsonExporter, Retriever, health_without_advisor,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const NOTES: &[(&str, &str, &str)] = &[
    ("Pune", "baner.txt", "Baner rents climb as IT hiring returns to Pune."),
    ("Pune", "wakad.txt", "Wakad supply is rising along the Pune metro corridor."),
    ("Pune East", "kharadi.txt", "Kharadi offices keep Pune East rental demand high."),
    ("Pune East", "viman_nagar.txt", "Viman Nagar near the airport draws Pune East tenants."),
    ("Hyderabad", "gachibowli.txt", "Gachibowli absorbs new Hyderabad office leases."),
    ("Hyderabad", "kondapur.txt", "Kondapur resale prices firm up in Hyderabad."),
];

/// Six one-chunk documents across three city folders, indexed.
async fn build_small_index(temp: &TempDir) -> Config {
    let mut config = common::temp_config(temp);
    config.retrieval.chunk_size = 4000;
    config.retrieval.chunk_overlap = 100;

    for (city, file, text) in NOTES {
        let dir = config.data.corpus_dir.join(city);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), text).unwrap();
    }

    let stats = IndexBuilder::new(config.clone()).build().await.unwrap();
    assert_eq!(stats.chunks_created, NOTES.len());
    config
}

fn retriever_for(config: &Config) -> Retriever {
    Retriever::new(
        config.retrieval.clone(),
        EmbeddingClient::new(config.embeddings.clone()),
    )
}

#[tokio::test]
async fn test_absent_index_returns_nothing() {
    let temp = TempDir::new().unwrap();
    let config = common::temp_config(&temp);
    let retriever = Retriever::new(
        config.retrieval.clone(),
        EmbeddingClient::new(config.embeddings.clone()),
    );

    let results = retriever
        .retrieve("metro connectivity", Some("Pune"), 5)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_city_filtered_retrieval_over_generated_corpus() {
    let temp = TempDir::new().unwrap();
    let mut config = common::temp_config(&temp);
    // One chunk per document keeps the city header in every chunk.
    config.retrieval.chunk_size = 4000;
    config.retrieval.chunk_overlap = 100;

    let written = CorpusGenerator::new(7)
        .generate(&config.data.corpus_dir)
        .unwrap();
    assert!(!written.is_empty());

    let stats = IndexBuilder::new(config.clone()).build().await.unwrap();
    assert_eq!(stats.documents_indexed, written.len());
    assert_eq!(stats.chunks_created, written.len());

    let retriever = Retriever::new(
        config.retrieval.clone(),
        EmbeddingClient::new(config.embeddings.clone()),
    );

    for city in ["Hyderabad", "Bengaluru", "Pune"] {
        let results = retriever.retrieve_for_city(city, 3).await.unwrap();
        assert!(!results.is_empty(), "no documents for {}", city);
        assert!(results.len() <= 3);
        assert!(
            results
                .iter()
                .all(|doc| doc.city.as_deref() == Some(city))
        );
        assert!(
            results
                .windows(2)
                .all(|pair| pair[0].score >= pair[1].score)
        );
    }

    let none = retriever.retrieve("anything", Some("Pune"), 0).await.unwrap();
    assert!(none.is_empty());

    let report = retriever.check().await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.vector_count, stats.chunks_created);
}

#[tokio::test]
async fn test_truncated_metadata_skips_out_of_range_rows() {
    let temp = TempDir::new().unwrap();
    let config = build_small_index(&temp).await;

    let metadata: Vec<DocumentChunk> = JsonExporter::read(&config.retrieval.metadata_path).unwrap();
    JsonExporter::write(&config.retrieval.metadata_path, &metadata[..1], false).unwrap();

    let retriever = retriever_for(&config);
    let results = retriever.retrieve("rental demand", None, 5).await.unwrap();

    assert!(results.len() <= 1);
    for doc in &results {
        assert_eq!(doc.row_id, 0);
        assert_eq!(doc.source, metadata[0].source);
    }

    let report = retriever.check().await.unwrap();
    assert_eq!(report.vector_count, NOTES.len());
    assert_eq!(report.metadata_count, 1);
    assert!(!report.is_consistent());
}

#[tokio::test]
async fn test_deleted_metadata_returns_nothing() {
    let temp = TempDir::new().unwrap();
    let config = build_small_index(&temp).await;
    let retriever = retriever_for(&config);

    assert!(!retriever.retrieve_for_city("Pune", 3).await.unwrap().is_empty());

    fs::remove_file(&config.retrieval.metadata_path).unwrap();

    assert!(retriever.retrieve_for_city("Pune", 3).await.unwrap().is_empty());
    assert!(retriever.retrieve("rental demand", None, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_city_match_includes_sub_regions() {
    let temp = TempDir::new().unwrap();
    let mut config = build_small_index(&temp).await;
    let k = NOTES.len();

    let exact = retriever_for(&config).retrieve_for_city("Pune", k).await.unwrap();
    assert_eq!(exact.len(), 2);
    assert!(exact.iter().all(|doc| doc.city.as_deref() == Some("Pune")));

    config.retrieval.city_match = CityMatch::Partial;
    let partial = retriever_for(&config).retrieve_for_city("Pune", k).await.unwrap();

    assert_eq!(partial.len(), 4);
    assert!(partial.iter().any(|doc| doc.city.as_deref() == Some("Pune East")));
    assert!(
        partial
            .iter()
            .all(|doc| doc.city.as_deref() != Some("Hyderabad"))
    );
    assert!(
        partial
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score)
    );
}

#[tokio::test]
async fn test_index_from_another_encoder_returns_nothing() {
    let temp = TempDir::new().unwrap();
    let config = build_small_index(&temp).await;

    let mut other = config.embeddings.clone();
    other.dimension = 32;
    let retriever = Retriever::new(config.retrieval.clone(), EmbeddingClient::new(other));

    assert!(retriever.retrieve_for_city("Pune", 3).await.unwrap().is_empty());

    fs::remove_file(&config.retrieval.manifest_path).unwrap();
    let same_encoder = retriever_for(&config);
    assert!(same_encoder.retrieve_for_city("Pune", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_component_health_without_a_trained_model() {
    let temp = TempDir::new().unwrap();
    let config = build_small_index(&temp).await;

    let Err(load_error) = Advisor::from_config(&config) else {
        panic!("advisor should not load without a trained model");
    };
    let report = health_without_advisor(&config, &load_error).await;

    let status = |name: &str| {
        report
            .checks
            .iter()
            .find(|check| check.component == name)
            .map(|check| check.status)
            .unwrap()
    };
    assert_eq!(status("price_model"), HealthStatus::Unhealthy);
    assert_eq!(status("dataset"), HealthStatus::Unhealthy);
    assert_eq!(status("similarity_index"), HealthStatus::Healthy);
    assert_eq!(status("llm"), HealthStatus::Unhealthy);
    assert_eq!(report.overall_status, HealthStatus::Unhealthy);
}
