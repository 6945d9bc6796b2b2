//! CLI module for Open Canvas
//! 
//! Handles command-line argument parsing.

pub mod args;

pub use args::{ArtifactArg, Args, AssistantsCommand, Commands, Verbosity};
