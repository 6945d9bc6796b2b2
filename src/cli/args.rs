//! Command-line argument parsing for Open Canvas
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::rag::RetrievalMode;

/// Open Canvas - chat and artifacts grounded in your vector indexes
#[derive(Parser, Debug)]
#[command(name = "opencanvas")]
#[command(version)]
#[command(about = "Chat with assistants backed by retrieval-augmented generation", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// User that owns the assistants
    #[arg(short, long, global = true, default_value = "local")]
    pub user: String,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress everything but results and errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage assistants
    Assistants {
        #[command(subcommand)]
        action: AssistantsCommand,
    },

    /// List vector indexes available to bind
    Indexes,

    /// Answer one question with an assistant's vector index
    Ask {
        /// Assistant id
        assistant: String,

        /// The question or artifact request
        query: String,

        /// Produce an artifact instead of a chat reply
        #[arg(long, value_enum, requires_if("update", "artifact_file"))]
        artifact: Option<ArtifactArg>,

        /// Start from this file as the conversation's artifact
        #[arg(long, value_name = "PATH")]
        artifact_file: Option<PathBuf>,

        /// Write a new artifact as code in this language
        #[arg(long, value_name = "LANG", requires = "artifact")]
        code: Option<String>,

        /// Number of matches to retrieve
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Start an interactive chat with an assistant
    Chat {
        /// Assistant id
        assistant: String,
    },

    /// Check provider keys and reachability
    Doctor,

    /// Display current configuration
    Config,
}

/// Assistant management subcommands
#[derive(Subcommand, Debug)]
pub enum AssistantsCommand {
    /// List assistants
    List,

    /// Show one assistant
    Show { id: String },

    /// Create an assistant
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        system_prompt: Option<String>,
        /// Vector index to search when answering
        #[arg(long)]
        index: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Edit an assistant; omitted options keep their stored values
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        system_prompt: Option<String>,
        /// Vector index to bind; pass "" to unbind
        #[arg(long)]
        index: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete an assistant
    Delete { id: String },
}

/// Artifact handling for `ask`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactArg {
    /// Write a new artifact
    New,
    /// Rewrite the artifact given with `--artifact-file`
    Update,
    /// Decide from the conversation
    Auto,
}

impl From<ArtifactArg> for RetrievalMode {
    fn from(arg: ArtifactArg) -> Self {
        match arg {
            ArtifactArg::New => RetrievalMode::NewArtifact,
            ArtifactArg::Update => RetrievalMode::UpdateArtifact,
            ArtifactArg::Auto => RetrievalMode::Auto,
        }
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Parse the config file's `default_verbosity`
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Check if should show spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["opencanvas", "-q", "indexes"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["opencanvas", "indexes"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["opencanvas", "-v", "indexes"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["opencanvas", "-vv", "indexes"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_default_user() {
        assert_eq!(parse(&["opencanvas", "indexes"]).user, "local");
        assert_eq!(parse(&["opencanvas", "indexes", "--user", "ana"]).user, "ana");
    }

    #[test]
    fn test_create_requires_name() {
        assert!(Args::try_parse_from(["opencanvas", "assistants", "create"]).is_err());

        let args = parse(&[
            "opencanvas", "assistants", "create", "--name", "Docs", "--index", "docs",
        ]);
        match args.command {
            Commands::Assistants {
                action: AssistantsCommand::Create { name, index, .. },
            } => {
                assert_eq!(name, "Docs");
                assert_eq!(index.as_deref(), Some("docs"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_ask_with_artifact() {
        let args = parse(&["opencanvas", "ask", "a-1", "write a memo", "--artifact", "new"]);
        match args.command {
            Commands::Ask { artifact, .. } => {
                assert_eq!(artifact, Some(ArtifactArg::New));
                assert_eq!(
                    RetrievalMode::from(artifact.unwrap()),
                    RetrievalMode::NewArtifact
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_needs_artifact_file() {
        assert!(Args::try_parse_from(["opencanvas", "ask", "a-1", "shorter", "--artifact", "update"]).is_err());

        let args = parse(&[
            "opencanvas", "ask", "a-1", "shorter", "--artifact", "update", "--artifact-file", "notes.md",
        ]);
        match args.command {
            Commands::Ask { artifact, artifact_file, .. } => {
                assert_eq!(artifact, Some(ArtifactArg::Update));
                assert_eq!(artifact_file, Some(PathBuf::from("notes.md")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_code_language_needs_artifact_mode() {
        assert!(Args::try_parse_from(["opencanvas", "ask", "a-1", "sort", "--code", "rust"]).is_err());

        let args = parse(&["opencanvas", "ask", "a-1", "sort", "--artifact", "new", "--code", "rust"]);
        match args.command {
            Commands::Ask { code, .. } => assert_eq!(code.as_deref(), Some("rust")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_from_config() {
        assert_eq!(Verbosity::from_config("verbose"), Some(Verbosity::Verbose));
        assert_eq!(Verbosity::from_config("loud"), None);
        assert_eq!(Verbosity::Quiet.as_str(), "quiet");
        assert!(!Verbosity::Quiet.show_progress());
    }
}
