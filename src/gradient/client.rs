//! Gradient REST client
//!
//! One method per service call the fine-tune flow makes. Every request
//! carries the bearer token and the workspace header; 401/403 map to
//! `GradientError::Unauthorized`, any other non-success status surfaces the
//! response body.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::gradient::GradientError;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://api.gradient.ai/api";

/// Gradient client configuration
#[derive(Clone, Debug)]
pub struct GradientConfig {
    /// Workspace access token
    pub access_token: String,
    /// Workspace identifier, sent with every request
    pub workspace_id: String,
    /// API base URL
    pub base_url: String,
}

impl GradientConfig {
    /// Read the configuration from the process environment.
    ///
    /// The caller is expected to have loaded `.env` first (dotenvy); the
    /// process environment wins when both define a variable.
    pub fn from_env() -> Result<Self, GradientError> {
        let access_token = require_env("GRADIENT_ACCESS_TOKEN")?;
        let workspace_id = require_env("GRADIENT_WORKSPACE_ID")?;
        let base_url = std::env::var("GRADIENT_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            access_token,
            workspace_id,
            base_url,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, GradientError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GradientError::MissingEnv(name)),
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// A base model available in the workspace
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseModel {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    models: Vec<BaseModel>,
}

/// A fine-tunable adapter created from a base model
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAdapter {
    pub id: String,
    pub name: String,
}

/// One fine-tuning sample in the service's input format
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub inputs: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdapterRequest<'a> {
    name: &'a str,
    base_model_id: &'a str,
}

#[derive(Debug, Serialize)]
struct FineTuneRequest<'a> {
    samples: &'a [Sample],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest<'a> {
    query: &'a str,
    max_generated_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteResponse {
    generated_output: String,
}

// ============================================================================
// GradientClient
// ============================================================================

/// Authenticated client for the Gradient API
pub struct GradientClient {
    client: reqwest::Client,
    config: GradientConfig,
}

impl GradientClient {
    /// Build a client from its configuration
    pub fn new(config: GradientConfig) -> Result<Self, GradientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self { client, config })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        self.client
            .request(method, url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.access_token),
            )
            .header("x-gradient-workspace-id", &self.config.workspace_id)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, GradientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GradientError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GradientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Resolve a base model by its slug
    pub async fn base_model(&self, slug: &str) -> Result<BaseModel, GradientError> {
        tracing::debug!(slug, "fetching base model");

        let response = self
            .request(Method::GET, "/models")
            .query(&[("onlyBase", "true")])
            .send()
            .await?;
        let list: ModelList = Self::check(response).await?.json().await?;

        list.models
            .into_iter()
            .find(|model| model.slug.as_deref() == Some(slug))
            .ok_or_else(|| GradientError::UnknownBaseModel(slug.to_string()))
    }

    /// Create a new model adapter from a base model
    pub async fn create_model_adapter(
        &self,
        base_model_id: &str,
        name: &str,
    ) -> Result<ModelAdapter, GradientError> {
        tracing::debug!(base_model_id, name, "creating model adapter");

        let response = self
            .request(Method::POST, "/models")
            .json(&CreateAdapterRequest {
                name,
                base_model_id,
            })
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Run one fine-tuning pass over the given samples
    pub async fn fine_tune(
        &self,
        adapter_id: &str,
        samples: &[Sample],
    ) -> Result<(), GradientError> {
        tracing::info!(adapter_id, count = samples.len(), "fine-tuning adapter");

        let response = self
            .request(Method::POST, &format!("/models/{}/fine-tune", adapter_id))
            .json(&FineTuneRequest { samples })
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Generate one completion from the adapter
    pub async fn complete(
        &self,
        adapter_id: &str,
        query: &str,
        max_generated_token_count: u32,
    ) -> Result<String, GradientError> {
        tracing::debug!(adapter_id, "requesting completion");

        let response = self
            .request(Method::POST, &format!("/models/{}/complete", adapter_id))
            .json(&CompleteRequest {
                query,
                max_generated_token_count,
            })
            .send()
            .await?;

        let completion: CompleteResponse = Self::check(response).await?.json().await?;
        Ok(completion.generated_output)
    }

    /// Delete the adapter
    pub async fn delete_model_adapter(&self, adapter_id: &str) -> Result<(), GradientError> {
        tracing::info!(adapter_id, "deleting model adapter");

        let response = self
            .request(Method::DELETE, &format!("/models/{}", adapter_id))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GradientClient {
        GradientClient::new(GradientConfig {
            access_token: "token-123".to_string(),
            workspace_id: "workspace-456".to_string(),
            base_url: base_url.to_string(),
        })
        .unwrap()
    }

    #[test]
    #[serial]
    fn test_config_missing_env() {
        std::env::remove_var("GRADIENT_ACCESS_TOKEN");
        std::env::remove_var("GRADIENT_WORKSPACE_ID");

        let err = GradientConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            GradientError::MissingEnv("GRADIENT_ACCESS_TOKEN")
        ));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("GRADIENT_ACCESS_TOKEN", "token");
        std::env::set_var("GRADIENT_WORKSPACE_ID", "workspace");
        std::env::remove_var("GRADIENT_API_URL");

        let config = GradientConfig::from_env().unwrap();
        assert_eq!(config.access_token, "token");
        assert_eq!(config.workspace_id, "workspace");
        assert_eq!(config.base_url, DEFAULT_API_URL);

        std::env::remove_var("GRADIENT_ACCESS_TOKEN");
        std::env::remove_var("GRADIENT_WORKSPACE_ID");
    }

    #[test]
    #[serial]
    fn test_config_from_dotenv_file() {
        std::env::remove_var("GRADIENT_ACCESS_TOKEN");
        std::env::remove_var("GRADIENT_WORKSPACE_ID");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GRADIENT_ACCESS_TOKEN=file-token").unwrap();
        writeln!(file, "GRADIENT_WORKSPACE_ID=file-workspace").unwrap();
        dotenvy::from_path(file.path()).unwrap();

        let config = GradientConfig::from_env().unwrap();
        assert_eq!(config.access_token, "file-token");
        assert_eq!(config.workspace_id, "file-workspace");

        std::env::remove_var("GRADIENT_ACCESS_TOKEN");
        std::env::remove_var("GRADIENT_WORKSPACE_ID");
    }

    #[tokio::test]
    async fn test_base_model_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("onlyBase", "true"))
            .and(header("Authorization", "Bearer token-123"))
            .and(header("x-gradient-workspace-id", "workspace-456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [
                    {"id": "model-a", "slug": "bloom-560m"},
                    {"id": "model-b", "slug": "nous-hermes2"}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let base = client.base_model("nous-hermes2").await.unwrap();
        assert_eq!(base.id, "model-b");
    }

    #[tokio::test]
    async fn test_base_model_unknown_slug() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"models": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.base_model("nope").await.unwrap_err();
        assert!(matches!(err, GradientError::UnknownBaseModel(slug) if slug == "nope"));
    }

    #[tokio::test]
    async fn test_create_adapter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models"))
            .and(body_partial_json(serde_json::json!({
                "name": "test model 3",
                "baseModelId": "model-b"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "adapter-1",
                "name": "test model 3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let adapter = client
            .create_model_adapter("model-b", "test model 3")
            .await
            .unwrap();
        assert_eq!(adapter.id, "adapter-1");
        assert_eq!(adapter.name, "test model 3");
    }

    #[tokio::test]
    async fn test_fine_tune_and_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/adapter-1/fine-tune"))
            .and(body_partial_json(serde_json::json!({
                "samples": [{"inputs": "### Instruction: Job? \n\n### Response: SDE at google"}]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/adapter-1/complete"))
            .and(body_partial_json(serde_json::json!({
                "maxGeneratedTokenCount": 100
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generatedOutput": " SDE at google"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let samples = vec![Sample {
            inputs: "### Instruction: Job? \n\n### Response: SDE at google".to_string(),
        }];
        client.fine_tune("adapter-1", &samples).await.unwrap();

        let completion = client
            .complete("adapter-1", "### Instruction: Job? \n\n### Response:", 100)
            .await
            .unwrap();
        assert_eq!(completion, " SDE at google");
    }

    #[tokio::test]
    async fn test_delete_adapter() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/models/adapter-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.delete_model_adapter("adapter-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_status_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.base_model("nous-hermes2").await.unwrap_err();
        assert!(matches!(err, GradientError::Unauthorized));
    }

    #[tokio::test]
    async fn test_api_error_includes_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.delete_model_adapter("adapter-1").await.unwrap_err();
        match err {
            GradientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal failure");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
