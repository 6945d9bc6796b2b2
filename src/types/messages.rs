//! Message types for canvas conversations
//!
//! Defines the ordered message log of a conversation and the single
//! artifact a conversation can carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::errors::Result;

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(name)
    }
}

/// A single conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// What the canvas renders an artifact as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Text,
    Code,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Text => f.write_str("text"),
            ArtifactKind::Code => f.write_str("code"),
        }
    }
}

/// User-editable document or code block shown next to the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Artifact {
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Text,
            title: title.into(),
            content: content.into(),
            language: None,
        }
    }

    pub fn code(
        title: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            kind: ArtifactKind::Code,
            title: title.into(),
            content: content.into(),
            language: Some(language.into()),
        }
    }

    /// Load an artifact from disk. Prose extensions (or none) give a text
    /// artifact; any other extension is taken as the code language.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        match extension.as_deref() {
            None | Some("md") | Some("markdown") | Some("txt") => Ok(Self::text(title, content)),
            Some(language) => Ok(Self::code(title, content, language)),
        }
    }
}

/// Conversation state passed through the retrieval node
///
/// Messages are append-only; a conversation has at most one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            artifact: None,
        }
    }

    /// Most recent message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Copy of this state with `message` appended
    pub fn with_message(&self, message: Message) -> Self {
        let mut next = self.clone();
        next.push(message);
        next
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = Message::assistant("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hello"}"#);

        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[test]
    fn test_last_message() {
        let mut state = ConversationState::new();
        assert!(state.last_message().is_none());

        state.push(Message::user("first"));
        state.push(Message::user("second"));
        assert_eq!(state.last_message().unwrap().content, "second");
    }

    #[test]
    fn test_with_message_leaves_original_untouched() {
        let state = ConversationState::from_messages(vec![Message::user("q")]);
        let next = state.with_message(Message::assistant("a"));

        assert_eq!(state.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.messages[0], state.messages[0]);
        assert_eq!(next.messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_artifact_from_file() {
        let temp = tempfile::TempDir::new().unwrap();

        let notes = temp.path().join("notes.md");
        std::fs::write(&notes, "# Notes\n").unwrap();
        let text = Artifact::from_file(&notes).unwrap();
        assert_eq!(text.kind, ArtifactKind::Text);
        assert_eq!(text.title, "notes.md");
        assert_eq!(text.content, "# Notes\n");
        assert!(text.language.is_none());

        let script = temp.path().join("sort.py");
        std::fs::write(&script, "print(sorted(xs))").unwrap();
        let code = Artifact::from_file(&script).unwrap();
        assert_eq!(code.kind, ArtifactKind::Code);
        assert_eq!(code.language.as_deref(), Some("py"));

        assert!(Artifact::from_file(&temp.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_artifact_constructors() {
        let code = Artifact::code("Sort", "fn main() {}", "rust");
        assert_eq!(code.kind, ArtifactKind::Code);
        assert_eq!(code.language.as_deref(), Some("rust"));

        let text = Artifact::text("Email", "Hi team");
        assert!(text.language.is_none());
        assert_eq!(text.kind.to_string(), "text");
    }
}
