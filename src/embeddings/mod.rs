//! Embedding generation
//!
//! Turns text into a fixed-length vector through a hosted API. There is no
//! local model and no fallback: if the provider fails, the call fails.

pub mod openai;

use async_trait::async_trait;

use crate::errors::Result;

pub use openai::{OpenAiEmbeddings, DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL};

/// Text to vector provider
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier sent to the provider
    fn model(&self) -> &str;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;
}
