// Retrieval-augmented generation
//
// The retrieval node embeds the latest user message, searches the
// assistant's vector index, and asks the language model to answer (or to
// write the artifact) with the retrieved text as context.
//
// Components:
// - Context: joins retrieved match text in rank order
// - Node: embed -> query -> assemble -> render prompt -> generate

pub mod context;
pub mod node;

// Re-export key types
pub use context::{assemble, RetrievedContext, DOCUMENT_SEPARATOR};
pub use node::{NodeConfig, RetrievalMode, RetrievalNode};
