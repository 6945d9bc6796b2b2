//! Line editor for the chat loop

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// rustyline editor bound to a prompt and an optional history file
pub struct LineReader {
    editor: DefaultEditor,
    prompt: String,
    history: Option<PathBuf>,
}

impl LineReader {
    /// Open the editor, loading `history` when it already exists
    pub fn open(prompt: impl Into<String>, history: Option<PathBuf>) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = history.as_ref().filter(|p| p.exists()) {
            // A corrupt history file only costs the old entries
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            prompt: prompt.into(),
            history,
        })
    }

    /// Next trimmed line; `None` once the user hits Ctrl-D or Ctrl-C
    pub fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Write history back, creating its directory if needed
    pub fn close(mut self) -> Result<()> {
        let Some(path) = self.history.take() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.editor.save_history(&path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::History;
    use tempfile::TempDir;

    #[test]
    fn test_history_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state").join("chat_history");

        let mut reader = LineReader::open("docs> ", Some(path.clone())).unwrap();
        let _ = reader.editor.add_history_entry("what is in the docs?");
        let _ = reader.editor.add_history_entry("/new summary");
        reader.close().unwrap();
        assert!(path.exists());

        let reopened = LineReader::open("docs> ", Some(path)).unwrap();
        assert_eq!(reopened.editor.history().len(), 2);
        assert_eq!(reopened.prompt, "docs> ");
    }

    #[test]
    fn test_close_without_history_is_noop() {
        let reader = LineReader::open("> ", None).unwrap();
        assert!(reader.close().is_ok());
    }
}
