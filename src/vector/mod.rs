//! Vector index providers
//!
//! Hosted similarity-search stores queried with an embedding. Results come
//! back in provider rank order; nothing here paginates, filters or dedups.

pub mod pinecone;
pub mod qdrant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{VectorConfig, VectorProvider};
use crate::errors::Result;

pub use pinecone::PineconeIndex;
pub use qdrant::QdrantIndex;

/// Metadata key holding the retrievable text of a match
pub const CONTENT_KEY: &str = "content";

/// One ranked hit from a vector query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl VectorMatch {
    /// Text stored under `metadata.content`, when it is a string
    pub fn content(&self) -> Option<&str> {
        self.metadata.get(CONTENT_KEY).and_then(|v| v.as_str())
    }
}

/// Similarity-search store
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Names of the indexes available to this account
    async fn list_indexes(&self) -> Result<Vec<String>>;

    /// Query `index` with `vector`, returning at most `top_k` matches
    async fn query(&self, index: &str, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>>;
}

/// Build the configured backend
pub fn connect(config: &VectorConfig) -> Result<Arc<dyn VectorIndex>> {
    match config.provider {
        VectorProvider::Pinecone => Ok(Arc::new(PineconeIndex::from_config(config)?)),
        VectorProvider::Qdrant => Ok(Arc::new(QdrantIndex::new(&config.qdrant_url)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn match_with(metadata: serde_json::Value) -> VectorMatch {
        VectorMatch {
            id: "m1".to_string(),
            score: 0.9,
            metadata: metadata.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_content_present() {
        let m = match_with(json!({"content": "Rust is fast", "source": "a.md"}));
        assert_eq!(m.content(), Some("Rust is fast"));
    }

    #[test]
    fn test_content_missing_or_not_string() {
        assert_eq!(match_with(json!({"source": "a.md"})).content(), None);
        assert_eq!(match_with(json!({"content": 42})).content(), None);
    }

    #[test]
    fn test_match_deserializes_without_metadata() {
        let m: VectorMatch = serde_json::from_str(r#"{"id":"x","score":0.5}"#).unwrap();
        assert!(m.metadata.is_empty());
        assert!(m.content().is_none());
    }
}
