//! The `sdk` binary: CLI surface, configuration, and progress display.

pub mod cli;
pub mod commands;
pub mod config;
pub mod progress;

pub use cli::{Cli, Commands, RepoCommands};
pub use config::{SdkConfig, SdkHome};
