//! Create/edit assistant dialog state
//!
//! The dialog is modelled without any rendering: a front end feeds it
//! user edits, asks it to submit, and shows whatever [`Notification`]
//! comes back. Closing or cancelling always returns every field to its
//! default.

use std::time::Duration;

use crate::assistant::{
    Assistant, AssistantService, CreateAssistantFields, FieldsMetadata, IconData,
    DEFAULT_ICON_COLOR, DEFAULT_ICON_NAME,
};
use crate::errors::{CanvasError, Result};
use crate::vector::VectorIndex;

/// How long a toast stays on screen
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// Dismissible toast shown after a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: NotificationVariant,
    pub duration: Duration,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: NotificationVariant::Default,
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: NotificationVariant::Destructive,
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Result of pressing "Save"
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Required-field validation blocked the submit; nothing was sent
    Invalid(String),
    /// A precondition failed before any request; the dialog stays open
    Rejected(Notification),
    /// The service accepted the assistant; the dialog is closed
    Saved {
        assistant: Assistant,
        notification: Notification,
    },
    /// The service call failed; the dialog is closed
    Failed(Notification),
}

impl SubmitOutcome {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            SubmitOutcome::Invalid(_) => None,
            SubmitOutcome::Rejected(n) | SubmitOutcome::Failed(n) => Some(n),
            SubmitOutcome::Saved { notification, .. } => Some(notification),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

/// Form state of the create/edit assistant dialog
#[derive(Debug, Clone)]
pub struct AssistantForm {
    name: String,
    description: String,
    system_prompt: String,
    icon_name: String,
    icon_color: String,
    has_selected_icon: bool,
    vector_index: String,
    available_indexes: Vec<String>,
    open: bool,
    all_disabled: bool,
    editing: bool,
    assistant: Option<Assistant>,
}

impl Default for AssistantForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            system_prompt: String::new(),
            icon_name: DEFAULT_ICON_NAME.to_string(),
            icon_color: DEFAULT_ICON_COLOR.to_string(),
            has_selected_icon: false,
            vector_index: String::new(),
            available_indexes: Vec::new(),
            open: false,
            all_disabled: false,
            editing: false,
            assistant: None,
        }
    }

    /// Form for creating a new assistant
    pub fn for_create() -> Self {
        let mut form = Self::new();
        form.sync(None, false);
        form
    }

    /// Form pre-populated from an existing assistant
    pub fn for_edit(assistant: &Assistant) -> Self {
        let mut form = Self::new();
        form.sync(Some(assistant), true);
        form
    }

    /// Re-derive the fields whenever the target assistant or mode changes
    pub fn sync(&mut self, assistant: Option<&Assistant>, editing: bool) {
        self.editing = editing;
        self.assistant = assistant.cloned();

        match (editing, assistant) {
            (true, Some(assistant)) => {
                let icon = assistant.metadata.icon_data.clone().unwrap_or_default();
                self.name = assistant.name.clone();
                self.description = assistant.metadata.description.clone().unwrap_or_default();
                self.system_prompt = assistant.config.system_prompt.clone().unwrap_or_default();
                self.has_selected_icon = true;
                self.icon_name = icon.icon_name;
                self.icon_color = icon.icon_color;
                self.vector_index = assistant.metadata.vector_index.clone().unwrap_or_default();
            }
            (false, _) => self.reset_state(),
            // Editing without a target: nothing to show, fields untouched
            (true, None) => {}
        }
    }

    /// Populate the index selector. A provider failure is logged and the
    /// current list is kept.
    pub async fn load_indexes(&mut self, index: &dyn VectorIndex) {
        match index.list_indexes().await {
            Ok(indexes) => {
                tracing::debug!(count = indexes.len(), "loaded vector indexes");
                self.available_indexes = indexes;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch vector indexes");
            }
        }
    }

    /// Return every field to its default
    pub fn reset_state(&mut self) {
        self.name.clear();
        self.description.clear();
        self.system_prompt.clear();
        self.icon_name = DEFAULT_ICON_NAME.to_string();
        self.icon_color = DEFAULT_ICON_COLOR.to_string();
        self.has_selected_icon = false;
        self.vector_index.clear();
    }

    /// Open or close the dialog; closing resets the fields
    pub fn set_open(&mut self, open: bool) {
        if !open {
            self.reset_state();
        }
        self.open = open;
    }

    /// The "Cancel" button
    pub fn cancel(&mut self) {
        self.reset_state();
        self.set_open(false);
    }

    /// Editing without an assistant renders nothing
    pub fn should_render(&self) -> bool {
        !(self.editing && self.assistant.is_none())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.system_prompt = system_prompt.into();
    }

    pub fn select_icon(&mut self, icon_name: impl Into<String>) {
        self.has_selected_icon = true;
        self.icon_name = icon_name.into();
    }

    /// Colours typed without a leading `#` get one
    pub fn set_icon_color(&mut self, color: &str) {
        self.icon_color = normalize_color(color);
    }

    /// Pick an index by name; an empty name clears the binding
    pub fn select_vector_index(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            self.vector_index.clear();
            return Ok(());
        }

        if !self.available_indexes.is_empty() && !self.available_indexes.iter().any(|i| i == name) {
            return Err(CanvasError::Validation(format!(
                "unknown vector index '{}'",
                name
            )));
        }

        self.vector_index = name.to_string();
        Ok(())
    }

    /// Required-field check run before anything is sent
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CanvasError::Validation("Name is required".to_string()));
        }
        Ok(())
    }

    /// Snapshot of the fields as submitted
    pub fn fields(&self) -> CreateAssistantFields {
        CreateAssistantFields {
            name: self.name.clone(),
            description: self.description.clone(),
            system_prompt: self.system_prompt.clone(),
            icon_data: IconData {
                icon_name: self.icon_name.clone(),
                icon_color: self.icon_color.clone(),
            },
            metadata: FieldsMetadata {
                vector_index: self.vector_index.clone(),
            },
        }
    }

    /// The "Save" button
    pub async fn submit(
        &mut self,
        user_id: Option<&str>,
        service: &dyn AssistantService,
    ) -> SubmitOutcome {
        if let Err(e) = self.validate() {
            return SubmitOutcome::Invalid(validation_message(e));
        }

        let Some(user_id) = user_id else {
            return SubmitOutcome::Rejected(Notification::destructive("User not found"));
        };

        if self.editing && self.assistant.is_none() {
            return SubmitOutcome::Rejected(Notification::destructive("Assistant not found"));
        }

        self.all_disabled = true;
        let verb = if self.editing { "edit" } else { "create" };
        let fields = self.fields();

        let result = match (&self.assistant, self.editing) {
            (Some(assistant), true) => {
                service
                    .edit(fields, &assistant.assistant_id, user_id)
                    .await
            }
            _ => service.create(fields, user_id).await,
        };

        let outcome = match result {
            Ok(assistant) => {
                let past = if self.editing { "edited" } else { "created" };
                SubmitOutcome::Saved {
                    assistant,
                    notification: Notification::success(format!("Assistant {} successfully", past)),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to {} assistant", verb);
                SubmitOutcome::Failed(
                    Notification::destructive(format!("Failed to {} assistant", verb))
                        .with_description(e.to_string()),
                )
            }
        };

        self.all_disabled = false;
        self.set_open(false);
        outcome
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn icon_color(&self) -> &str {
        &self.icon_color
    }

    pub fn has_selected_icon(&self) -> bool {
        self.has_selected_icon
    }

    pub fn vector_index(&self) -> &str {
        &self.vector_index
    }

    pub fn available_indexes(&self) -> &[String] {
        &self.available_indexes
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.all_disabled
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Dialog heading
    pub fn title(&self) -> &'static str {
        if self.editing {
            "Edit Assistant"
        } else {
            "Create Assistant"
        }
    }
}

fn validation_message(err: CanvasError) -> String {
    match err {
        CanvasError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

fn normalize_color(color: &str) -> String {
    if color.starts_with('#') {
        color.to_string()
    } else {
        format!("#{}", color)
    }
}
