// Context assembly for retrieval prompts
use serde::{Deserialize, Serialize};

use crate::vector::VectorMatch;

/// Placed between consecutive retrieved documents
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Retrieved text ready to drop into a prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    /// Match contents joined in rank order
    pub text: String,
    /// IDs of the matches that contributed text
    pub document_ids: Vec<String>,
    /// Matches that carried no `content` metadata
    pub skipped: usize,
}

impl RetrievedContext {
    pub fn document_count(&self) -> usize {
        self.document_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_ids.is_empty()
    }
}

/// Join the `content` of each match, keeping provider order
pub fn assemble(matches: &[VectorMatch]) -> RetrievedContext {
    let mut parts = Vec::with_capacity(matches.len());
    let mut document_ids = Vec::with_capacity(matches.len());
    let mut skipped = 0;

    for m in matches {
        match m.content() {
            Some(content) => {
                parts.push(content);
                document_ids.push(m.id.clone());
            }
            None => skipped += 1,
        }
    }

    RetrievedContext {
        text: parts.join(DOCUMENT_SEPARATOR),
        document_ids,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_match(id: &str, metadata: serde_json::Value, score: f32) -> VectorMatch {
        VectorMatch {
            id: id.to_string(),
            score,
            metadata: metadata.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_assemble_empty() {
        let context = assemble(&[]);
        assert!(context.is_empty());
        assert_eq!(context.text, "");
    }

    #[test]
    fn test_assemble_keeps_rank_order() {
        let matches = vec![
            create_match("2", json!({"content": "Most relevant"}), 0.95),
            create_match("1", json!({"content": "Less relevant"}), 0.70),
        ];

        let context = assemble(&matches);
        assert_eq!(context.text, "Most relevant\n\nLess relevant");
        assert_eq!(context.document_ids, vec!["2", "1"]);
    }

    #[test]
    fn test_assemble_skips_matches_without_content() {
        let matches = vec![
            create_match("1", json!({"content": "kept"}), 0.9),
            create_match("2", json!({"title": "no body"}), 0.8),
            create_match("3", json!({"content": "also kept"}), 0.7),
        ];

        let context = assemble(&matches);
        assert_eq!(context.text, "kept\n\nalso kept");
        assert_eq!(context.document_count(), 2);
        assert_eq!(context.skipped, 1);
    }

    #[test]
    fn test_content_is_not_trimmed() {
        let matches = vec![create_match("1", json!({"content": "  padded\n"}), 0.9)];
        assert_eq!(assemble(&matches).text, "  padded\n");
    }
}
