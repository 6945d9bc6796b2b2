//! Assistant persistence on disk
//!
//! One JSON file per user: `{dir}/{user_id}.json` holding that user's
//! assistants in creation order.
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::assistant::{Assistant, AssistantService, CreateAssistantFields};
use crate::errors::{CanvasError, Result};

/// File-backed assistant store
pub struct AssistantStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl AssistantStore {
    /// Create store, making the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn user_file(&self, user_id: &str) -> Result<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && user_id != "."
            && user_id != "..";
        if !valid {
            return Err(CanvasError::Validation(format!("invalid user id '{}'", user_id)));
        }
        Ok(self.dir.join(format!("{}.json", user_id)))
    }

    fn read_all(&self, user_id: &str) -> Result<Vec<Assistant>> {
        let path = self.user_file(user_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path)?;
        let assistants = serde_json::from_str(&json)?;
        Ok(assistants)
    }

    fn write_all(&self, user_id: &str, assistants: &[Assistant]) -> Result<()> {
        let path = self.user_file(user_id)?;
        let json = serde_json::to_string_pretty(assistants)?;
        fs::write(&path, json)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock guards no data; keep going
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All assistants of a user, oldest first
    pub fn list(&self, user_id: &str) -> Result<Vec<Assistant>> {
        let mut assistants = self.read_all(user_id)?;
        assistants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(assistants)
    }

    pub fn get(&self, user_id: &str, assistant_id: &str) -> Result<Assistant> {
        self.read_all(user_id)?
            .into_iter()
            .find(|a| a.assistant_id == assistant_id)
            .ok_or_else(|| CanvasError::not_found("Assistant", assistant_id))
    }

    pub fn create_assistant(&self, fields: CreateAssistantFields, user_id: &str) -> Result<Assistant> {
        require_name(&fields)?;
        let _guard = self.lock();

        let mut assistants = self.read_all(user_id)?;
        let assistant = fields.into_assistant(user_id);
        assistants.push(assistant.clone());
        self.write_all(user_id, &assistants)?;

        tracing::info!(assistant_id = %assistant.assistant_id, user_id, "assistant created");
        Ok(assistant)
    }

    pub fn edit_assistant(
        &self,
        fields: CreateAssistantFields,
        assistant_id: &str,
        user_id: &str,
    ) -> Result<Assistant> {
        require_name(&fields)?;
        let _guard = self.lock();

        let mut assistants = self.read_all(user_id)?;
        let assistant = assistants
            .iter_mut()
            .find(|a| a.assistant_id == assistant_id)
            .ok_or_else(|| CanvasError::not_found("Assistant", assistant_id))?;

        fields.apply_to(assistant);
        let edited = assistant.clone();
        self.write_all(user_id, &assistants)?;

        tracing::info!(assistant_id, user_id, "assistant edited");
        Ok(edited)
    }

    pub fn delete(&self, user_id: &str, assistant_id: &str) -> Result<()> {
        let _guard = self.lock();

        let mut assistants = self.read_all(user_id)?;
        let before = assistants.len();
        assistants.retain(|a| a.assistant_id != assistant_id);

        if assistants.len() == before {
            return Err(CanvasError::not_found("Assistant", assistant_id));
        }

        self.write_all(user_id, &assistants)?;
        tracing::info!(assistant_id, user_id, "assistant deleted");
        Ok(())
    }
}

fn require_name(fields: &CreateAssistantFields) -> Result<()> {
    if fields.name.trim().is_empty() {
        return Err(CanvasError::Validation("name is required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl AssistantService for AssistantStore {
    async fn create(&self, fields: CreateAssistantFields, user_id: &str) -> Result<Assistant> {
        self.create_assistant(fields, user_id)
    }

    async fn edit(
        &self,
        fields: CreateAssistantFields,
        assistant_id: &str,
        user_id: &str,
    ) -> Result<Assistant> {
        self.edit_assistant(fields, assistant_id, user_id)
    }
}
