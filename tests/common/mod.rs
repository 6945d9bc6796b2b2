//! In-memory providers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use opencanvas::embeddings::EmbeddingProvider;
use opencanvas::llm::LanguageModel;
use opencanvas::rag::RetrievalNode;
use opencanvas::vector::{VectorIndex, VectorMatch};
use opencanvas::{CanvasError, Result};

/// Embeds every text as its length, so queries are easy to tell apart
pub struct LengthEmbedder;

#[async_trait]
impl EmbeddingProvider for LengthEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![text.len() as f32, 1.0])
    }

    fn model(&self) -> &str {
        "length"
    }

    fn dimension(&self) -> usize {
        2
    }
}

/// Named indexes holding documents in rank order
#[derive(Default)]
pub struct MemoryIndex {
    indexes: HashMap<String, Vec<VectorMatch>>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl MemoryIndex {
    pub fn with_documents(mut self, index: &str, docs: &[(&str, &str)]) -> Self {
        let matches = docs
            .iter()
            .enumerate()
            .map(|(rank, (id, content))| VectorMatch {
                id: id.to_string(),
                score: 1.0 - rank as f32 * 0.1,
                metadata: json!({ "content": content }).as_object().cloned().unwrap(),
            })
            .collect();
        self.indexes.insert(index.to_string(), matches);
        self
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.indexes.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn query(&self, index: &str, _vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        self.queries.lock().unwrap().push((index.to_string(), top_k));
        let matches = self
            .indexes
            .get(index)
            .ok_or_else(|| CanvasError::VectorApiError(format!("index {} not found", index)))?;
        Ok(matches.iter().take(top_k).cloned().collect())
    }
}

/// Replies from a script, recording every prompt it sees
pub struct ScriptedModel {
    replies: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| CanvasError::LlmApiError("script exhausted".to_string()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub fn node(index: Arc<MemoryIndex>, model: Arc<ScriptedModel>) -> RetrievalNode {
    RetrievalNode::new(Arc::new(LengthEmbedder), index, model)
}
