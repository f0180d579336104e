// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AdvisorError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub retrieval: RetrievalConfig,
    pub embeddings: EmbeddingConfig,
    pub llm: LlmConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    pub dataset_path: PathBuf,
    pub corpus_dir: PathBuf,
    pub chunks_path: PathBuf,
    pub rows_per_locality: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    pub best_model_file: String,
    pub test_fraction: f64,
    pub seed: u64,
    pub budget_tolerance: f64,
    pub metro_max_km: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    pub index_uri: PathBuf,
    pub table_name: String,
    pub metadata_path: PathBuf,
    pub manifest_path: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    #[serde(default)]
    pub chunk_unit: ChunkUnit,
    pub top_k: usize,
    pub overfetch_factor: usize,
    #[serde(default)]
    pub city_match: CityMatch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkUnit {
    #[default]
    Chars,
    Words,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CityMatch {
    #[default]
    Exact,
    Partial,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,
    pub dimension: usize,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    #[default]
    Hashing,
    OpenAi,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub download_name: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| AdvisorError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GOLDEN_MILE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AdvisorError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| AdvisorError::Config(e.to_string()))?;

        config.apply_api_key_env();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5001,
            },
            data: DataConfig {
                dataset_path: PathBuf::from("data/structured/real_estate_data.csv"),
                corpus_dir: PathBuf::from("data/unstructured"),
                chunks_path: PathBuf::from("data/processed/text_chunks.json"),
                rows_per_locality: 150,
                seed: 42,
            },
            model: ModelConfig {
                model_dir: PathBuf::from("models"),
                best_model_file: "best_price_model.json".to_string(),
                test_fraction: 0.2,
                seed: 42,
                budget_tolerance: 1.25,
                metro_max_km: 2.0,
            },
            retrieval: RetrievalConfig {
                index_uri: PathBuf::from("vector_store/lancedb"),
                table_name: "chunks".to_string(),
                metadata_path: PathBuf::from("vector_store/metadata.json"),
                manifest_path: PathBuf::from("vector_store/manifest.json"),
                chunk_size: 500,
                chunk_overlap: 50,
                chunk_unit: ChunkUnit::Chars,
                top_k: 5,
                overfetch_factor: 3,
                city_match: CityMatch::Exact,
            },
            embeddings: EmbeddingConfig {
                provider: EmbeddingProvider::Hashing,
                dimension: 384,
                model: "text-embedding-3-small".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: None,
            },
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                temperature: 0.3,
                max_tokens: 1200,
                system_prompt: "You are a real estate investment advisor.".to_string(),
                timeout_secs: 120,
            },
            report: ReportConfig {
                output_dir: PathBuf::from("reports"),
                download_name: "Golden_Mile_Advisory_Report.pdf".to_string(),
            },
        }
    }

    pub fn best_model_path(&self) -> PathBuf {
        self.model.model_dir.join(&self.model.best_model_file)
    }

    /// `OPENAI_API_KEY` fills in whichever API keys the config left empty.
    fn apply_api_key_env(&mut self) {
        let Ok(key) = std::env::var("OPENAI_API_KEY") else {
            return;
        };
        if key.trim().is_empty() {
            return;
        }

        if self.llm.api_key.is_none() {
            self.llm.api_key = Some(key.clone());
        }
        if self.embeddings.provider == EmbeddingProvider::OpenAi && self.embeddings.api_key.is_none()
        {
            self.embeddings.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_port(self.server.port)?;
        Validator::validate_url(&self.llm.base_url)?;

        if self.retrieval.chunk_size == 0 {
            return Err(AdvisorError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(AdvisorError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.retrieval.chunk_overlap, self.retrieval.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 || self.retrieval.overfetch_factor == 0 {
            return Err(AdvisorError::Config(
                "top_k and overfetch_factor must be greater than 0".to_string(),
            ));
        }

        if self.embeddings.dimension == 0 {
            return Err(AdvisorError::Config(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }

        if self.embeddings.provider == EmbeddingProvider::OpenAi {
            Validator::validate_url(&self.embeddings.base_url)?;
        }

        if !(self.model.test_fraction > 0.0 && self.model.test_fraction < 1.0) {
            return Err(AdvisorError::Config(
                "test_fraction must be between 0 and 1".to_string(),
            ));
        }

        if self.model.budget_tolerance <= 0.0 {
            return Err(AdvisorError::Config(
                "budget_tolerance must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
