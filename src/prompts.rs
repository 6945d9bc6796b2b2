//! Prompt templates for retrieval-augmented responses and artifacts
//!
//! Templates use `{name}` placeholders. Rendering is plain interpolation:
//! values go in verbatim and the surrounding text is never touched.

use crate::errors::{CanvasError, Result};
use crate::types::ArtifactKind;

macro_rules! code_prompt_rules {
    () => {
        "- Do NOT include triple backticks when generating code. The code should be in plain text."
    };
}

pub const DEFAULT_CODE_PROMPT_RULES: &str = code_prompt_rules!();

pub const APP_CONTEXT: &str = r#"
<app-context>
The name of the application is "Open Canvas". Open Canvas is a web application where users have a chat window and a canvas to display an artifact.
Artifacts can be any sort of writing content, emails, code, or other creative writing work. Think of artifacts as content, or writing you might find on a blog, Google doc, or other writing platform.
Users only have a single artifact per conversation, however they have the ability to go back and fourth between artifact edits/revisions.
If a user asks you to generate something completely different from the current artifact, you may do this, as the UI displaying the artifacts will be updated to show whatever they've requested.
Even if the user goes from a 'text' artifact to a 'code' artifact.
</app-context>
"#;

pub const RAG_RETRIEVAL_PROMPT: &str = r#"You are an AI assistant that incorporates retrieved documents to generate your response.
The following documents have been retrieved based on the user's query:

<retrieved-documents>
{retrievedDocuments}
</retrieved-documents>

Use these documents as additional context to respond to the user's query below:

<user-query>
{userQuery}
</user-query>

Rules and guidelines:
<rules-guidelines>
- Ensure you reference the retrieved documents in your response, but do not include their full content unless explicitly requested by the user.
- Respond directly and concisely to the user's query while using the retrieved context appropriately.
- Avoid speculative answers; rely on the provided context whenever possible.
</rules-guidelines>"#;

pub const RAG_RETRIEVAL_UPDATE_ARTIFACT_PROMPT: &str = concat!(
    r#"You are an AI assistant, and the user has requested updates to their artifact using the retrieved documents.

Here is the current artifact content:
<artifact>
{artifactContent}
</artifact>

The following documents have been retrieved based on the user's query:
<retrieved-documents>
{retrievedDocuments}
</retrieved-documents>

Use these retrieved documents as additional context to make the updates the user has requested.

Rules and guidelines:
<rules-guidelines>
- Respond with the updated artifact only. Do not include any tags, explanations, or extra text before or after.
- If a retrieved document contradicts the artifact, use your judgment to align with the user's query.
- Use proper markdown syntax if applicable, except when writing code, as the system does not render markdown for code.
- Do not wrap the response in triple backticks unless requested by the user.
"#,
    code_prompt_rules!(),
    r#"
</rules-guidelines>

{updateMetaPrompt}

Ensure you ONLY respond with the updated artifact."#
);

pub const RAG_RETRIEVAL_NEW_ARTIFACT_PROMPT: &str = concat!(
    r#"You are an AI assistant tasked with generating a new artifact based on the user's query and the retrieved documents.

The following documents have been retrieved as context for the user's request:
<retrieved-documents>
{retrievedDocuments}
</retrieved-documents>

Generate the artifact based on the user's request:
<user-query>
{userQuery}
</user-query>

Rules and guidelines:
<rules-guidelines>
- Ensure you leverage the retrieved documents in generating the artifact.
- Respond with the entire artifact only. Do not include additional tags or explanations.
- If writing code, adhere to the provided rules for generating code artifacts.
"#,
    code_prompt_rules!(),
    r#"
</rules-guidelines>"#
);

// The second line holds two spaces
/// Plain prompt used by the retrieval node when no artifact is involved
pub const RETRIEVAL_NODE_PROMPT: &str = "Using the retrieved content below, generate a response to the user query:\n  \nRetrieved Content:\n{retrievedContent}\n\nUser Query:\n{userQuery}";

pub const OPTIONALLY_UPDATE_META_PROMPT: &str = r#"It has been pre-determined based on the user's message and other context that the type of the artifact should be:
<artifact-type>
{artifactType}
</artifact-type>

{artifactTitle}"#;

/// The fixed set of templates the retrieval node can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    RetrievalNode,
    RagResponse,
    RagNewArtifact,
    RagUpdateArtifact,
    UpdateMeta,
}

impl PromptTemplate {
    pub fn text(&self) -> &'static str {
        match self {
            PromptTemplate::RetrievalNode => RETRIEVAL_NODE_PROMPT,
            PromptTemplate::RagResponse => RAG_RETRIEVAL_PROMPT,
            PromptTemplate::RagNewArtifact => RAG_RETRIEVAL_NEW_ARTIFACT_PROMPT,
            PromptTemplate::RagUpdateArtifact => RAG_RETRIEVAL_UPDATE_ARTIFACT_PROMPT,
            PromptTemplate::UpdateMeta => OPTIONALLY_UPDATE_META_PROMPT,
        }
    }

    /// Placeholder names in order of first appearance
    pub fn variables(&self) -> Vec<&'static str> {
        placeholders(self.text())
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String> {
        interpolate(self.text(), vars)
    }

    /// Whether this template produces artifact content rather than a chat reply
    pub fn generates_artifact(&self) -> bool {
        matches!(
            self,
            PromptTemplate::RagNewArtifact | PromptTemplate::RagUpdateArtifact
        )
    }
}

/// Pick the template for a turn
pub fn select_template(has_artifact: bool, wants_artifact: bool) -> PromptTemplate {
    match (has_artifact, wants_artifact) {
        (true, _) => PromptTemplate::RagUpdateArtifact,
        (false, true) => PromptTemplate::RagNewArtifact,
        (false, false) => PromptTemplate::RagResponse,
    }
}

/// Replace every `{name}` in `template` with its value from `vars`.
///
/// Values are not rescanned, so braces inside them survive untouched.
/// A `{` that does not open a well-formed placeholder is copied as is.
pub fn interpolate(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match placeholder_name(after) {
            Some(name) => {
                let value = vars
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| CanvasError::MissingTemplateVariable {
                        name: name.to_string(),
                    })?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Name of the placeholder starting right after a `{`
fn placeholder_name(after_brace: &str) -> Option<&str> {
    let end = after_brace.find('}')?;
    let name = &after_brace[..end];
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match placeholder_name(after) {
            Some(name) => {
                if !names.contains(&name) {
                    names.push(name);
                }
                rest = &after[name.len() + 1..];
            }
            None => rest = after,
        }
    }

    names
}

/// Render the meta prompt telling the model which artifact type to produce
pub fn update_meta_prompt(kind: ArtifactKind, title: Option<&str>) -> Result<String> {
    let title_line = match title {
        Some(t) if !t.trim().is_empty() => format!(
            "And its title should be:\n<artifact-title>\n{}\n</artifact-title>",
            t
        ),
        _ => String::new(),
    };
    let kind = kind.to_string();

    PromptTemplate::UpdateMeta.render(&[
        ("artifactType", kind.as_str()),
        ("artifactTitle", title_line.as_str()),
    ])
}

/// Prefix artifact prompts with the app context and the assistant's own
/// system prompt. Chat replies are left unchanged.
pub fn with_assistant_context(
    template: PromptTemplate,
    system_prompt: Option<&str>,
    rendered: String,
) -> String {
    if !template.generates_artifact() {
        return rendered;
    }

    match system_prompt {
        Some(sp) if !sp.trim().is_empty() => format!("{}\n{}\n{}", sp, APP_CONTEXT, rendered),
        _ => format!("{}\n{}", APP_CONTEXT, rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_retrieval_node_prompt_layout() {
        let rendered = PromptTemplate::RetrievalNode
            .render(&[("retrievedContent", "doc a\n\ndoc b"), ("userQuery", "why?")])
            .unwrap();
        assert_eq!(
            rendered,
            "Using the retrieved content below, generate a response to the user query:\n  \n\
             Retrieved Content:\ndoc a\n\ndoc b\n\nUser Query:\nwhy?"
        );
    }

    #[test]
    fn test_rag_prompt_variables() {
        assert_eq!(
            PromptTemplate::RagResponse.variables(),
            vec!["retrievedDocuments", "userQuery"]
        );
        assert_eq!(
            PromptTemplate::RagUpdateArtifact.variables(),
            vec!["artifactContent", "retrievedDocuments", "updateMetaPrompt"]
        );
        assert_eq!(
            PromptTemplate::RetrievalNode.variables(),
            vec!["retrievedContent", "userQuery"]
        );
    }

    #[test]
    fn test_code_rules_are_embedded() {
        assert!(RAG_RETRIEVAL_UPDATE_ARTIFACT_PROMPT.contains(DEFAULT_CODE_PROMPT_RULES));
        assert!(RAG_RETRIEVAL_NEW_ARTIFACT_PROMPT.contains(DEFAULT_CODE_PROMPT_RULES));
        assert!(!RAG_RETRIEVAL_PROMPT.contains(DEFAULT_CODE_PROMPT_RULES));
    }

    #[test]
    fn test_render_rag_response() {
        let rendered = PromptTemplate::RagResponse
            .render(&[("retrievedDocuments", "doc one\n\ndoc two"), ("userQuery", "What is X?")])
            .unwrap();

        let expected = RAG_RETRIEVAL_PROMPT
            .replace("{retrievedDocuments}", "doc one\n\ndoc two")
            .replace("{userQuery}", "What is X?");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_missing_variable() {
        let err = PromptTemplate::RagResponse
            .render(&[("userQuery", "q")])
            .unwrap_err();
        assert!(matches!(
            err,
            CanvasError::MissingTemplateVariable { ref name } if name == "retrievedDocuments"
        ));
    }

    #[test]
    fn test_values_are_not_reinterpolated() {
        let out = interpolate("A {x} B", &[("x", "{y}"), ("y", "nope")]).unwrap();
        assert_eq!(out, "A {y} B");
    }

    #[test]
    fn test_stray_braces_survive() {
        let out = interpolate("fn main() { {v} } {", &[("v", "1")]).unwrap();
        assert_eq!(out, "fn main() { 1 } {");
    }

    #[test]
    fn test_select_template() {
        assert_eq!(select_template(false, false), PromptTemplate::RagResponse);
        assert_eq!(select_template(false, true), PromptTemplate::RagNewArtifact);
        assert_eq!(select_template(true, false), PromptTemplate::RagUpdateArtifact);
        assert_eq!(select_template(true, true), PromptTemplate::RagUpdateArtifact);
    }

    #[test]
    fn test_update_meta_prompt() {
        let meta = update_meta_prompt(ArtifactKind::Code, Some("Quicksort")).unwrap();
        assert!(meta.contains("<artifact-type>\ncode\n</artifact-type>"));
        assert!(meta.contains("Quicksort"));

        let untitled = update_meta_prompt(ArtifactKind::Text, None).unwrap();
        assert!(!untitled.contains("artifact-title"));
    }

    #[test]
    fn test_assistant_context_only_for_artifacts() {
        let reply = with_assistant_context(
            PromptTemplate::RagResponse,
            Some("You are terse."),
            "body".to_string(),
        );
        assert_eq!(reply, "body");

        let artifact = with_assistant_context(
            PromptTemplate::RagNewArtifact,
            Some("You are terse."),
            "body".to_string(),
        );
        assert!(artifact.starts_with("You are terse."));
        assert!(artifact.contains("<app-context>"));
        assert!(artifact.ends_with("body"));
    }

    #[quickcheck]
    fn prop_value_inserted_verbatim(value: String) -> bool {
        let out = interpolate("before {v} after", &[("v", value.as_str())]).unwrap();
        out == format!("before {} after", value)
    }

    #[quickcheck]
    fn prop_text_without_placeholders_unchanged(text: String) -> bool {
        let text = text.replace('{', "");
        interpolate(&text, &[]).unwrap() == text
    }
}
