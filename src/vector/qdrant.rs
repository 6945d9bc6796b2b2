//! Qdrant-backed vector index
//!
//! Collections stand in for indexes; point payloads become match metadata.
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{with_payload_selector::SelectorOptions, SearchPoints, Value as QdrantValue, WithPayloadSelector},
};
use serde_json::Value as JsonValue;

use crate::errors::{CanvasError, Result};
use crate::vector::{VectorIndex, VectorMatch};

/// Vector index over a Qdrant server
pub struct QdrantIndex {
    client: QdrantClient,
    url: String,
}

impl QdrantIndex {
    pub fn new(url: &str) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to create Qdrant client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .list_collections()
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to list collections: {}", e)))?;

        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    async fn query(&self, index: &str, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        tracing::debug!(collection = index, top_k, "querying qdrant");

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: index.to_string(),
                vector: vector.to_vec(),
                limit: top_k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| CanvasError::VectorApiError(format!("Failed to search points: {}", e)))?;

        let matches = search_result
            .result
            .into_iter()
            .map(|point| {
                let metadata = point
                    .payload
                    .iter()
                    .filter_map(|(key, value)| qdrant_to_json_value(value).map(|v| (key.clone(), v)))
                    .collect();

                VectorMatch {
                    id: point_id_to_string(&point.id),
                    score: point.score,
                    metadata,
                }
            })
            .collect();

        Ok(matches)
    }
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| {
        use qdrant_client::qdrant::value::Kind;
        match kind {
            Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
            Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
            Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
            Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
            _ => None,
        }
    })
}

fn point_id_to_string(point_id: &Option<qdrant_client::qdrant::PointId>) -> String {
    point_id
        .as_ref()
        .and_then(|id| {
            use qdrant_client::qdrant::point_id::PointIdOptions;
            match &id.point_id_options {
                Some(PointIdOptions::Num(n)) => Some(n.to_string()),
                Some(PointIdOptions::Uuid(u)) => Some(u.clone()),
                None => None,
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}
