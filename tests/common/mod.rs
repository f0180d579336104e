// file: tests/common/mod.rs
// description: shared fixtures: temp workspace with dataset, trained model and index paths

#![allow(dead_code)]

use golden_mile::{Config, DatasetGenerator, Trainer, write_dataset};
use tempfile::TempDir;

pub fn temp_config(temp: &TempDir) -> Config {
    let root = temp.path();
    let mut config = Config::default_config();

    config.data.dataset_path = root.join("data/structured/real_estate_data.csv");
    config.data.corpus_dir = root.join("data/unstructured");
    config.data.chunks_path = root.join("data/processed/text_chunks.json");
    config.data.rows_per_locality = 20;

    config.model.model_dir = root.join("models");

    config.retrieval.index_uri = root.join("vector_store/lancedb");
    config.retrieval.metadata_path = root.join("vector_store/metadata.json");
    config.retrieval.manifest_path = root.join("vector_store/manifest.json");
    config.retrieval.chunk_size = 200;
    config.retrieval.chunk_overlap = 20;

    config.embeddings.dimension = 64;
    config.report.output_dir = root.join("reports");
    config.llm.api_key = None;

    config
}

/// Writes a small dataset and trains the price models into the temp workspace.
pub fn prepare_model(config: &Config) {
    let records =
        DatasetGenerator::new(config.data.rows_per_locality, config.data.seed).generate();
    write_dataset(&config.data.dataset_path, &records).unwrap();

    let outcome = Trainer::new(config.model.test_fraction, config.model.seed)
        .train(&records)
        .unwrap();
    outcome
        .save(
            &config.model.model_dir,
            &config.best_model_path(),
            &config.report.output_dir.join("model_comparison.csv"),
        )
        .unwrap();
}
