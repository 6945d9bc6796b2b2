//! Interactive chat with one assistant
//!
//! Each message goes through the retrieval node; the conversation and its
//! artifact live for the length of the session.

pub mod commands;
pub mod input;

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::assistant::Assistant;
use crate::rag::{NodeConfig, RetrievalMode, RetrievalNode};
use crate::types::{ConversationState, Message};
pub use commands::{is_command, Command, HELP_TEXT};
use input::LineReader;

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this and keep going
    Show(String),
    Exit,
}

/// Conversation state plus the node that advances it
pub struct ChatSession {
    node: RetrievalNode,
    assistant: Assistant,
    state: ConversationState,
    top_k: usize,
}

impl ChatSession {
    pub fn new(node: RetrievalNode, assistant: Assistant, top_k: usize) -> Self {
        Self {
            node,
            assistant,
            state: ConversationState::new(),
            top_k,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Handle one command. A failed run leaves the conversation untouched.
    pub async fn handle(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::Help => Reply::Show(HELP_TEXT.to_string()),
            Command::Exit => Reply::Exit,
            Command::Reset => {
                self.state = ConversationState::new();
                Reply::Show("Conversation cleared.".to_string())
            }
            Command::Artifact => match &self.state.artifact {
                Some(artifact) => Reply::Show(format!(
                    "# {} ({})\n\n{}",
                    artifact.title, artifact.kind, artifact.content
                )),
                None => Reply::Show("No artifact yet. Try /new <request>.".to_string()),
            },
            Command::Message { text } if text.is_empty() => Reply::Show(String::new()),
            Command::Message { text } => self.send(text, RetrievalMode::Respond, None).await?,
            Command::New { request, language } => {
                self.send(request, RetrievalMode::NewArtifact, language).await?
            }
            Command::Update { request } => {
                self.send(request, RetrievalMode::UpdateArtifact, None).await?
            }
            Command::Unknown { input } => Reply::Show(format!(
                "Unknown command: {}. Type /help for available commands",
                input
            )),
        };
        Ok(reply)
    }

    async fn send(
        &mut self,
        text: String,
        mode: RetrievalMode,
        language: Option<String>,
    ) -> Result<Reply> {
        let mut config = NodeConfig::from_assistant(&self.assistant)
            .mode(mode)
            .top_k(self.top_k);
        config.artifact_language = language;
        let pending = self.state.with_message(Message::user(text));

        let next = self.node.run(&pending, &config).await?;
        let reply = next
            .last_message()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.state = next;
        Ok(Reply::Show(reply))
    }

    /// Read-eval-print until /exit or EOF
    pub async fn run(&mut self, history: Option<PathBuf>) -> Result<()> {
        let prompt = format!("{}> ", self.assistant.name.to_lowercase());
        let mut input = LineReader::open(prompt, history)?;

        println!(
            "{} {}",
            "Chatting with".cyan(),
            self.assistant.name.bold()
        );
        println!("Type {} for commands, {} to leave.", "/help".cyan(), "/exit".cyan());

        while let Some(line) = input.next_line()? {
            match self.handle(Command::parse(&line)).await {
                Ok(Reply::Exit) => break,
                Ok(Reply::Show(text)) if text.is_empty() => {}
                Ok(Reply::Show(text)) => println!("{}\n", text),
                Err(e) => eprintln!("{} {}", "Error:".red(), e),
            }
        }

        input.close()?;
        println!("{}", "Goodbye!".green());
        Ok(())
    }
}
