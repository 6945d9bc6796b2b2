//! OpenAI embeddings client
//!
//! Endpoint: POST {base_url}/embeddings

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{Config, EmbeddingsConfig};
use crate::embeddings::EmbeddingProvider;
use crate::errors::{CanvasError, Result};

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Vector length produced by the default model
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Hosted embedding client
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddings {
    /// Create client with explicit settings
    pub fn new(base_url: &str, api_key: &str, model: &str, dimension: usize) -> Result<Self> {
        Self::with_timeout(base_url, api_key, model, dimension, Duration::from_secs(30))
    }

    fn with_timeout(
        base_url: &str,
        api_key: &str,
        model: &str,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CanvasError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            dimension,
        })
    }

    /// Create client from configuration, reading the API key from the environment
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self> {
        let api_key = Config::api_key(&config.api_key_env)?;
        Self::with_timeout(
            &config.base_url,
            &api_key,
            &config.model,
            config.dimension,
            Duration::from_secs(config.timeout_sec),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        tracing::debug!(model = %self.model, chars = text.len(), "requesting embedding");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CanvasError::EmbeddingApiError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CanvasError::EmbeddingApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| CanvasError::EmbeddingApiError(format!("Failed to parse response: {}", e)))?;

        check_dimension(first_embedding(body)?, self.dimension)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn first_embedding(body: EmbeddingResponse) -> Result<Vec<f32>> {
    body.data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| CanvasError::EmbeddingApiError("Response contained no embeddings".to_string()))
}

/// Reject vectors the configured index could not hold
fn check_dimension(embedding: Vec<f32>, expected: usize) -> Result<Vec<f32>> {
    if embedding.len() != expected {
        return Err(CanvasError::EmbeddingApiError(format!(
            "Expected {} dimensions, got {}; check embeddings.model and embeddings.dimension",
            expected,
            embedding.len()
        )));
    }
    Ok(embedding)
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiEmbeddings::new(
            "https://api.openai.com/v1/",
            "sk-test",
            DEFAULT_EMBEDDING_MODEL,
            DEFAULT_EMBEDDING_DIM,
        )
        .unwrap();

        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.model(), "text-embedding-3-small");
        assert_eq!(client.dimension(), 1536);
    }

    #[test]
    fn test_request_shape() {
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: "hello",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"], "hello");
    }

    #[test]
    fn test_first_embedding_parses_response() {
        let body: EmbeddingResponse = serde_json::from_str(
            r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.25,-0.5]}],"model":"text-embedding-3-small"}"#,
        )
        .unwrap();

        assert_eq!(first_embedding(body).unwrap(), vec![0.25, -0.5]);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        assert_eq!(check_dimension(vec![0.1, 0.2, 0.3], 3).unwrap().len(), 3);

        let err = check_dimension(vec![0.0; 3072], DEFAULT_EMBEDDING_DIM).unwrap_err();
        assert!(matches!(err, CanvasError::EmbeddingApiError(ref m) if m.contains("1536") && m.contains("3072")));
    }

    #[test]
    fn test_first_embedding_empty_data() {
        let body = EmbeddingResponse { data: vec![] };
        assert!(matches!(
            first_embedding(body),
            Err(CanvasError::EmbeddingApiError(_))
        ));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = EmbeddingsConfig {
            api_key_env: "OPENCANVAS_UNSET_EMBEDDING_KEY".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            OpenAiEmbeddings::from_config(&config),
            Err(CanvasError::ConfigError(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires OPENAI_API_KEY and network
    async fn test_embed_integration() {
        let client = OpenAiEmbeddings::from_config(&EmbeddingsConfig::default()).unwrap();
        let embedding = client.embed("Hello world").await.unwrap();
        assert_eq!(embedding.len(), DEFAULT_EMBEDDING_DIM);
    }
}
