// file: src/advisory/llm.rs
// description: OpenAI-compatible chat completion client for the narrative report
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::config::LlmConfig;
use crate::error::{AdvisorError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

lazy_static! {
    static ref BOLD_MARKERS: Regex = Regex::new(r"\*\*+").unwrap();
    static ref HEADING_MARKERS: Regex = Regex::new(r"#+").unwrap();
    static ref LINE_BULLETS: Regex = Regex::new(r"(?m)^[ \t]*- ").unwrap();
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AdvisorError::Config(
                    "No LLM API key configured; set OPENAI_API_KEY or llm.api_key".to_string(),
                )
            })
    }

    /// Sends the prompt and returns the cleaned narrative.
    pub async fn generate_report(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Requesting completion from {} ({} prompt chars)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisorError::Llm(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::Llm(format!(
                "Request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Llm(format!("Failed to parse response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AdvisorError::Llm("Response contained no message".to_string()))?;

        let report = clean_report(&content);
        if report.is_empty() {
            return Err(AdvisorError::Llm("Model returned an empty report".to_string()));
        }

        info!("Received {} chars from {}", report.len(), self.config.model);
        Ok(report)
    }
}

/// Strips bold and heading markers and line-leading bullets.
pub fn clean_report(text: &str) -> String {
    let text = BOLD_MARKERS.replace_all(text, "");
    let text = HEADING_MARKERS.replace_all(&text, "");
    let text = LINE_BULLETS.replace_all(&text, "");
    text.trim().to_string()
}
