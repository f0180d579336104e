// file: src/database/embeddings.rs
// description: text embeddings from a local hashing encoder or an OpenAI-compatible API
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::{AdvisorError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Name recorded in the index manifest.
    pub fn model_name(&self) -> String {
        match self.config.provider {
            EmbeddingProvider::Hashing => format!("hashing-{}", self.config.dimension),
            EmbeddingProvider::OpenAi => self.config.model.clone(),
        }
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AdvisorError::Embedding("No embedding produced".to_string()))
    }

    /// Remote failures are errors rather than a silent switch to the local
    /// encoder: one index must never mix two embedding spaces.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let dim = self.config.dimension;

        match self.config.provider {
            EmbeddingProvider::Hashing => Ok(texts.iter().map(|t| hash_embedding(t, dim)).collect()),
            EmbeddingProvider::OpenAi => {
                let vectors = self.request_embeddings(texts).await?;
                if vectors.len() != texts.len() || vectors.iter().any(|v| v.len() != dim) {
                    return Err(AdvisorError::Embedding(format!(
                        "Embedding API returned {} vectors of dimension {}, expected {} of dimension {}",
                        vectors.len(),
                        vectors.first().map(Vec::len).unwrap_or(0),
                        texts.len(),
                        dim
                    )));
                }
                debug!("Received {} remote embeddings", vectors.len());
                Ok(vectors.into_iter().map(normalize).collect())
            }
        }
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AdvisorError::Config("No embedding API key configured".to_string()))?;

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let request = EmbeddingRequest {
            input: texts,
            model: &self.config.model,
        };

        debug!("Requesting {} embeddings from {}", texts.len(), url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisorError::Embedding(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::Embedding(format!(
                "Request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Embedding(format!("Failed to parse response: {}", e)))?;

        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Signed feature hashing over lowercase alphanumeric tokens, L2-normalized.
/// Text without tokens maps to the zero vector.
pub fn hash_embedding(text: &str, dim: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dim];
    if dim == 0 {
        return vector;
    }

    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    for token in &tokens {
        add_feature(&mut vector, token.as_bytes(), 1.0);
    }
    for pair in tokens.windows(2) {
        let bigram = format!("{} {}", pair[0], pair[1]);
        add_feature(&mut vector, bigram.as_bytes(), 0.5);
    }

    normalize(vector)
}

fn add_feature(vector: &mut [f32], bytes: &[u8], weight: f32) {
    let hash = bytes
        .iter()
        .fold(FNV_OFFSET, |acc, &b| (acc ^ b as u64).wrapping_mul(FNV_PRIME));
    let index = (hash % vector.len() as u64) as usize;
    let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
    vector[index] += sign * weight;
}

fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}
