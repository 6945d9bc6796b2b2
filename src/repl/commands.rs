//! Built-in chat commands

/// What one line of chat input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    /// Drop the conversation and any artifact
    Reset,
    /// Print the current artifact
    Artifact,
    /// Write a new artifact from the request, as code when a language is given
    New {
        request: String,
        language: Option<String>,
    },
    /// Rewrite the current artifact following the request
    Update { request: String },
    /// Plain chat message
    Message { text: String },
    Unknown { input: String },
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

impl Command {
    /// Parse one input line. Anything not starting with `/` is a message.
    pub fn parse(input: &str) -> Command {
        let trimmed = input.trim();
        if !is_command(trimmed) {
            return Command::Message {
                text: trimmed.to_string(),
            };
        }

        let body = &trimmed[1..];
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };

        match name.to_lowercase().as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "reset" => Command::Reset,
            "artifact" | "show" => Command::Artifact,
            "new" => parse_new(rest).unwrap_or(Command::Unknown {
                input: trimmed.to_string(),
            }),
            "update" if !rest.is_empty() => Command::Update {
                request: rest.to_string(),
            },
            _ => Command::Unknown {
                input: trimmed.to_string(),
            },
        }
    }
}

/// `/new [--code <lang>] <request>`
fn parse_new(rest: &str) -> Option<Command> {
    let (language, request) = match rest.strip_prefix("--code") {
        Some(after) => {
            let (language, request) = after.trim_start().split_once(char::is_whitespace)?;
            (Some(language.to_string()), request.trim())
        }
        None => (None, rest),
    };

    if request.is_empty() {
        return None;
    }
    Some(Command::New {
        request: request.to_string(),
        language,
    })
}

pub const HELP_TEXT: &str = "\
Commands:
  /new <request>     write a new artifact from the assistant's documents
  /new --code <lang> <request>
                     write a new code artifact
  /update <request>  rewrite the current artifact
  /artifact          show the current artifact
  /reset             start a fresh conversation
  /help              show this help
  /exit              leave the chat
Anything else is sent to the assistant as a message.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        assert_eq!(
            Command::parse("  what changed in v2? "),
            Command::Message {
                text: "what changed in v2?".to_string()
            }
        );
    }

    #[test]
    fn test_builtins() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/Q"), Command::Exit);
        assert_eq!(Command::parse("/reset"), Command::Reset);
        assert_eq!(Command::parse("/show"), Command::Artifact);
    }

    #[test]
    fn test_artifact_requests_keep_text() {
        assert_eq!(
            Command::parse("/new  release notes for 2.0"),
            Command::New {
                request: "release notes for 2.0".to_string(),
                language: None,
            }
        );
        assert_eq!(
            Command::parse("/update make it shorter"),
            Command::Update {
                request: "make it shorter".to_string()
            }
        );
    }

    #[test]
    fn test_new_code_artifact() {
        assert_eq!(
            Command::parse("/new --code rust a binary search"),
            Command::New {
                request: "a binary search".to_string(),
                language: Some("rust".to_string()),
            }
        );
        assert!(matches!(Command::parse("/new --code rust"), Command::Unknown { .. }));
        assert!(matches!(Command::parse("/new --code"), Command::Unknown { .. }));
    }

    #[test]
    fn test_artifact_request_needs_text() {
        assert!(matches!(Command::parse("/new"), Command::Unknown { .. }));
        assert!(matches!(Command::parse("/update   "), Command::Unknown { .. }));
        assert!(matches!(Command::parse("/frobnicate"), Command::Unknown { .. }));
    }
}
