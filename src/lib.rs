//! Open Canvas - assistants, retrieval and artifacts from the terminal
//!
//! # Architecture
//!
//! - **Assistants**: stored configuration bundles and the create/edit form
//! - **Retrieval**: embed the latest message, query the assistant's vector
//!   index, render a prompt template, generate, append
//! - **Providers**: hosted embeddings, Pinecone or Qdrant indexes, OpenAI
//!   or Ollama language models

pub mod errors;
pub mod types;

// Providers
pub mod embeddings;
pub mod llm;
pub mod vector;

// Retrieval
pub mod prompts;
pub mod rag;

pub mod assistant;

// Interface
pub mod cli;
pub mod config;
pub mod doctor;
pub mod repl;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{CanvasError, Result};
