//! Type definitions module
//! 
//! Conversation messages and the artifact shown on the canvas.

pub mod messages;

// Re-export commonly used types
pub use messages::{Artifact, ArtifactKind, ConversationState, Message, Role};
