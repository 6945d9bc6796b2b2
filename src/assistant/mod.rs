//! Assistants: named configuration bundles a user picks before chatting
//!
//! An assistant carries a system prompt, an icon, and optionally the name
//! of the vector index the retrieval node should search.

pub mod form;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use form::{AssistantForm, Notification, NotificationVariant, SubmitOutcome};
pub use store::AssistantStore;

pub const DEFAULT_ICON_NAME: &str = "User";
pub const DEFAULT_ICON_COLOR: &str = "#000000";

/// Icon shown next to the assistant name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconData {
    pub icon_name: String,
    pub icon_color: String,
}

impl Default for IconData {
    fn default() -> Self {
        Self {
            icon_name: DEFAULT_ICON_NAME.to_string(),
            icon_color: DEFAULT_ICON_COLOR.to_string(),
        }
    }
}

/// Free-form metadata stored alongside an assistant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<IconData>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "pineconeIndex")]
    pub vector_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Runtime configuration passed to the graph nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// A stored assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    pub assistant_id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: AssistantMetadata,
    #[serde(default)]
    pub config: AssistantConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assistant {
    pub fn vector_index(&self) -> Option<&str> {
        self.metadata.vector_index.as_deref()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.config.system_prompt.as_deref()
    }

    pub fn icon(&self) -> IconData {
        self.metadata.icon_data.clone().unwrap_or_default()
    }
}

/// Metadata the dialog submits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsMetadata {
    #[serde(alias = "pineconeIndex")]
    pub vector_index: String,
}

/// Everything the create/edit dialog collects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantFields {
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub icon_data: IconData,
    pub metadata: FieldsMetadata,
}

impl CreateAssistantFields {
    /// Build a fresh assistant owned by `user_id`
    pub fn into_assistant(self, user_id: &str) -> Assistant {
        let now = Utc::now();
        let mut assistant = Assistant {
            assistant_id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            metadata: AssistantMetadata {
                user_id: Some(user_id.to_string()),
                ..Default::default()
            },
            config: AssistantConfig::default(),
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut assistant);
        assistant
    }

    /// Overwrite the editable parts of `assistant`; empty strings become absent
    pub fn apply_to(self, assistant: &mut Assistant) {
        assistant.name = self.name.trim().to_string();
        assistant.metadata.description = non_empty(self.description);
        assistant.metadata.icon_data = Some(self.icon_data);
        assistant.metadata.vector_index = non_empty(self.metadata.vector_index);
        assistant.config.system_prompt = non_empty(self.system_prompt);
        assistant.updated_at = Utc::now();
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Backend the dialog submits to
#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn create(&self, fields: CreateAssistantFields, user_id: &str) -> Result<Assistant>;

    async fn edit(
        &self,
        fields: CreateAssistantFields,
        assistant_id: &str,
        user_id: &str,
    ) -> Result<Assistant>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(vector_index: &str) -> CreateAssistantFields {
        CreateAssistantFields {
            name: "  Work Emails ".to_string(),
            description: String::new(),
            system_prompt: "You are an expert email assistant".to_string(),
            icon_data: IconData {
                icon_name: "Mail".to_string(),
                icon_color: "#ff0000".to_string(),
            },
            metadata: FieldsMetadata {
                vector_index: vector_index.to_string(),
            },
        }
    }

    #[test]
    fn test_into_assistant() {
        let assistant = fields("docs").into_assistant("user-1");

        assert_eq!(assistant.name, "Work Emails");
        assert_eq!(assistant.vector_index(), Some("docs"));
        assert_eq!(assistant.metadata.user_id.as_deref(), Some("user-1"));
        assert!(assistant.metadata.description.is_none());
        assert_eq!(assistant.system_prompt(), Some("You are an expert email assistant"));
        assert_eq!(assistant.icon().icon_name, "Mail");
    }

    #[test]
    fn test_empty_index_means_no_binding() {
        let assistant = fields("").into_assistant("user-1");
        assert!(assistant.vector_index().is_none());
    }

    #[test]
    fn test_legacy_pinecone_key_is_read() {
        let metadata: AssistantMetadata =
            serde_json::from_str(r#"{"description":"d","pineconeIndex":"legacy"}"#).unwrap();
        assert_eq!(metadata.vector_index.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_icon_defaults() {
        let icon = IconData::default();
        assert_eq!(icon.icon_name, "User");
        assert_eq!(icon.icon_color, "#000000");
    }
}
