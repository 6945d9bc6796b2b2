//! Pinecone REST client
//!
//! Control plane: GET {controller}/indexes, GET {controller}/indexes/{name}
//! Data plane:    POST https://{host}/query

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{Config, VectorConfig};
use crate::errors::{CanvasError, Result};
use crate::vector::{VectorIndex, VectorMatch};

/// API version pinned on every request
const API_VERSION: &str = "2024-07";

/// Pinecone-backed vector index
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    client: Client,
    controller_url: String,
    api_key: String,
}

impl PineconeIndex {
    /// Create client with explicit settings
    pub fn new(controller_url: &str, api_key: &str) -> Result<Self> {
        Self::with_timeout(controller_url, api_key, Duration::from_secs(30))
    }

    fn with_timeout(controller_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CanvasError::HttpError)?;

        Ok(Self {
            client,
            controller_url: controller_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create client from configuration, reading the API key from the environment
    pub fn from_config(config: &VectorConfig) -> Result<Self> {
        let api_key = Config::api_key(&config.api_key_env)?;
        Self::with_timeout(
            &config.controller_url,
            &api_key,
            Duration::from_secs(config.timeout_sec),
        )
    }

    pub fn controller_url(&self) -> &str {
        &self.controller_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    /// Resolve the data-plane host of an index
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let url = format!("{}/indexes/{}", self.controller_url, name);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to describe index: {}", e)))?;

        if response.status().as_u16() == 404 {
            return Err(CanvasError::not_found("Index", name));
        }

        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to parse index: {}", e)))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let url = format!("{}/indexes", self.controller_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to list indexes: {}", e)))?;

        let response = ensure_success(response).await?;
        let list: IndexList = response
            .json()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to parse indexes: {}", e)))?;

        Ok(list.indexes.into_iter().map(|i| i.name).collect())
    }

    async fn query(&self, index: &str, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        let description = self.describe_index(index).await?;
        let url = query_url(&description.host);

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };

        tracing::debug!(index, top_k, "querying pinecone");

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to query index: {}", e)))?;

        let response = ensure_success(response).await?;
        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to parse matches: {}", e)))?;

        Ok(body.matches)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(CanvasError::VectorApiError(format!(
        "HTTP {}: {}",
        status, error_text
    )))
}

/// Hosts come back without a scheme
fn query_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/query", host.trim_end_matches('/'))
    } else {
        format!("https://{}/query", host.trim_end_matches('/'))
    }
}

/// Index as described by the control plane
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub dimension: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}
