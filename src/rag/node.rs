// Retrieval node: answer the latest message from the assistant's vector index
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::assistant::Assistant;
use crate::embeddings::EmbeddingProvider;
use crate::errors::{CanvasError, Result};
use crate::llm::LanguageModel;
use crate::prompts::{self, PromptTemplate};
use crate::rag::context::{assemble, RetrievedContext};
use crate::types::{Artifact, ConversationState, Message};
use crate::vector::VectorIndex;

/// Default number of matches requested from the index
pub const DEFAULT_TOP_K: usize = 10;

/// Longest title derived from a user query
const MAX_DERIVED_TITLE_CHARS: usize = 60;

/// What the node should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Plain chat reply using the node's own prompt
    #[default]
    Respond,
    /// Write a new artifact from the retrieved documents
    NewArtifact,
    /// Rewrite the current artifact with the retrieved documents
    UpdateArtifact,
    /// Update the artifact if there is one, otherwise reply with the RAG prompt
    Auto,
}

/// Per-run configuration, usually derived from the selected assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub vector_index: Option<String>,
    pub system_prompt: Option<String>,
    pub top_k: usize,
    pub mode: RetrievalMode,
    /// New artifacts are code in this language; text when absent
    pub artifact_language: Option<String>,
    pub artifact_title: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            vector_index: None,
            system_prompt: None,
            top_k: DEFAULT_TOP_K,
            mode: RetrievalMode::default(),
            artifact_language: None,
            artifact_title: None,
        }
    }
}

impl NodeConfig {
    pub fn with_index(index: impl Into<String>) -> Self {
        Self {
            vector_index: Some(index.into()),
            ..Default::default()
        }
    }

    pub fn from_assistant(assistant: &Assistant) -> Self {
        Self {
            vector_index: assistant.metadata.vector_index.clone(),
            system_prompt: assistant.config.system_prompt.clone(),
            ..Default::default()
        }
    }

    pub fn mode(mut self, mode: RetrievalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Write new artifacts as code in `language`
    pub fn code(mut self, language: impl Into<String>) -> Self {
        self.artifact_language = Some(language.into());
        self
    }

    /// The bound index, treating an empty name as unbound
    fn index_name(&self) -> Result<&str> {
        match self.vector_index.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(CanvasError::IndexNotConfigured),
        }
    }
}

/// Embed → query → assemble → prompt → generate → append
pub struct RetrievalNode {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LanguageModel>,
}

impl RetrievalNode {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            embedder,
            index,
            llm,
        }
    }

    /// Run the node once, returning the next conversation state.
    ///
    /// The input state is never modified. Any provider failure ends the run.
    #[tracing::instrument(skip_all, fields(index = ?config.vector_index, mode = ?config.mode))]
    pub async fn run(
        &self,
        state: &ConversationState,
        config: &NodeConfig,
    ) -> Result<ConversationState> {
        let index_name = config.index_name()?;
        let user_query = state
            .last_message()
            .map(|m| m.content.as_str())
            .ok_or(CanvasError::EmptyConversation)?;

        let template = resolve_template(config.mode, state)?;

        let embedding = self.embedder.embed(user_query).await?;
        tracing::debug!(dimension = embedding.len(), "embedded user query");

        let matches = self.index.query(index_name, &embedding, config.top_k).await?;
        let context = assemble(&matches);
        tracing::info!(
            matches = matches.len(),
            used = context.document_count(),
            skipped = context.skipped,
            "retrieved documents"
        );

        let prompt = build_prompt(template, state, config, user_query, &context)?;
        let response = self.llm.generate(&prompt).await?;
        tracing::debug!(chars = response.len(), model = self.llm.model(), "generated response");

        Ok(apply_response(template, state, config, user_query, response))
    }
}

fn resolve_template(mode: RetrievalMode, state: &ConversationState) -> Result<PromptTemplate> {
    match mode {
        RetrievalMode::Respond => Ok(PromptTemplate::RetrievalNode),
        RetrievalMode::NewArtifact => Ok(PromptTemplate::RagNewArtifact),
        RetrievalMode::UpdateArtifact if !state.has_artifact() => Err(CanvasError::Validation(
            "conversation has no artifact to update".to_string(),
        )),
        RetrievalMode::UpdateArtifact => Ok(PromptTemplate::RagUpdateArtifact),
        RetrievalMode::Auto => Ok(prompts::select_template(state.has_artifact(), false)),
    }
}

fn build_prompt(
    template: PromptTemplate,
    state: &ConversationState,
    config: &NodeConfig,
    user_query: &str,
    context: &RetrievedContext,
) -> Result<String> {
    let rendered = match template {
        PromptTemplate::RetrievalNode => template.render(&[
            ("retrievedContent", context.text.as_str()),
            ("userQuery", user_query),
        ])?,
        PromptTemplate::RagResponse | PromptTemplate::RagNewArtifact => template.render(&[
            ("retrievedDocuments", context.text.as_str()),
            ("userQuery", user_query),
        ])?,
        PromptTemplate::RagUpdateArtifact => {
            let artifact = state.artifact.as_ref().ok_or_else(|| {
                CanvasError::Validation("conversation has no artifact to update".to_string())
            })?;
            let meta = prompts::update_meta_prompt(artifact.kind, Some(artifact.title.as_str()))?;
            template.render(&[
                ("artifactContent", artifact.content.as_str()),
                ("retrievedDocuments", context.text.as_str()),
                ("updateMetaPrompt", meta.as_str()),
            ])?
        }
        PromptTemplate::UpdateMeta => {
            return Err(CanvasError::Generic(
                "meta prompt cannot drive the retrieval node".to_string(),
            ))
        }
    };

    Ok(prompts::with_assistant_context(
        template,
        config.system_prompt.as_deref(),
        rendered,
    ))
}

fn apply_response(
    template: PromptTemplate,
    state: &ConversationState,
    config: &NodeConfig,
    user_query: &str,
    response: String,
) -> ConversationState {
    match template {
        PromptTemplate::RagNewArtifact => {
            let title = config
                .artifact_title
                .clone()
                .unwrap_or_else(|| derive_title(user_query));
            let artifact = match &config.artifact_language {
                Some(language) => Artifact::code(title.clone(), response, language.as_str()),
                None => Artifact::text(title.clone(), response),
            };
            let mut next = state.with_message(Message::assistant(format!("Created artifact: {}", title)));
            next.artifact = Some(artifact);
            next
        }
        PromptTemplate::RagUpdateArtifact => {
            let mut next = state.clone();
            let title = match next.artifact.as_mut() {
                Some(artifact) => {
                    artifact.content = response;
                    artifact.title.clone()
                }
                None => String::new(),
            };
            next.push(Message::assistant(format!("Updated artifact: {}", title)));
            next
        }
        _ => state.with_message(Message::assistant(response)),
    }
}

/// First line of the query, cut at a character boundary
fn derive_title(user_query: &str) -> String {
    let first_line = user_query.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return "Untitled".to_string();
    }
    let mut title: String = first_line.chars().take(MAX_DERIVED_TITLE_CHARS).collect();
    if first_line.chars().count() > MAX_DERIVED_TITLE_CHARS {
        title.push('…');
    }
    title
}
