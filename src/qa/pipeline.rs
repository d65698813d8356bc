//! Hosted question-answering pipeline
//!
//! Client for the Hugging Face inference API question-answering task. The
//! pipeline is built once at startup and owns its HTTP client; every request
//! from the serve loop goes through the same instance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::qa::{QaBackend, QaError};
use crate::types::QaAnswer;

/// Default model, matching the stock question-answering pipeline
pub const DEFAULT_MODEL: &str = "distilbert/distilbert-base-cased-distilled-squad";

/// Default inference API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co";

/// QA pipeline configuration
#[derive(Clone, Debug)]
pub struct QaConfig {
    /// Model repository to query
    pub model: String,
    /// Inference API base URL
    pub endpoint: String,
    /// Optional API token for gated or rate-limited access
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            model: std::env::var("QA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            endpoint: std::env::var("QA_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            api_token: std::env::var("HF_API_TOKEN")
                .or_else(|_| std::env::var("HF_TOKEN"))
                .ok()
                .filter(|token| !token.is_empty()),
            timeout_secs: 120,
        }
    }
}

// ============================================================================
// Inference API types
// ============================================================================

#[derive(Debug, Serialize)]
struct QaApiRequest<'a> {
    inputs: QaInputs<'a>,
}

#[derive(Debug, Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

/// The API returns either the answer shape or `{"error": ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QaApiResponse {
    Answer(QaAnswer),
    Error { error: String },
}

// ============================================================================
// HostedQaPipeline
// ============================================================================

/// Question answering over the hosted inference API
pub struct HostedQaPipeline {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl HostedQaPipeline {
    /// Build the pipeline from its configuration
    pub fn new(config: &QaConfig) -> Result<Self, QaError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let url = format!(
            "{}/models/{}",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            url,
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl QaBackend for HostedQaPipeline {
    async fn answer(&self, context: &str, question: &str) -> Result<QaAnswer, QaError> {
        let request = QaApiRequest {
            inputs: QaInputs { question, context },
        };

        tracing::debug!(url = %self.url, "sending question-answering request");

        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            // Block on the hosted model load instead of failing with a 503
            // while the model is still warming up.
            .header("x-wait-for-model", "true")
            .json(&request);

        if let Some(token) = &self.api_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(QaError::Backend(format!(
                "question answering request failed ({}): {}",
                status, body
            )));
        }

        match serde_json::from_str::<QaApiResponse>(&body) {
            Ok(QaApiResponse::Answer(answer)) => Ok(answer),
            Ok(QaApiResponse::Error { error }) => Err(QaError::Backend(error)),
            Err(e) => Err(QaError::Backend(format!(
                "unexpected response from model service: {}",
                e
            ))),
        }
    }
}
