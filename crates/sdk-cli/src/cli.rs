//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sdk",
    version,
    about = "Resolve, cache, and republish Maven artifacts between repositories"
)]
pub struct Cli {
    /// SDK home directory (defaults to $SDK_HOME or ~/.cuba-sdk)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a component and cache its full dependency closure
    Resolve {
        /// Component kind: framework, addon, or library
        kind: String,
        /// Component reference: a version for frameworks,
        /// group:artifact:version otherwise
        reference: String,
    },
    /// Upload a resolved component to target repositories
    Push {
        /// group:artifact:version (or group:artifact)
        coordinates: String,
        /// Upload only to the named repository
        #[arg(long)]
        repo: Option<String>,
    },
    /// Resolve and push in one run
    Install {
        kind: String,
        reference: String,
        #[arg(long)]
        repo: Option<String>,
    },
    /// Remove a component; shared dependencies are kept
    Remove {
        coordinates: String,
        /// Also delete the artifacts from target repositories
        #[arg(long)]
        remote: bool,
    },
    /// List resolved or installed components
    List {
        /// Which set to list: resolved or installed
        #[arg(default_value = "resolved")]
        set: String,
    },
    /// List known versions of a component
    Versions {
        /// group:artifact
        coordinates: String,
        /// Hide snapshots and other pre-releases
        #[arg(long)]
        stable_only: bool,
    },
    /// Manage configured repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
    /// Delete everything from the local artifact storage
    Clean,
}

#[derive(Subcommand)]
pub enum RepoCommands {
    /// Show configured repositories
    List,
    /// Add a repository
    Add {
        name: String,
        url: String,
        /// Repository kind: local, nexus2, nexus3, or bintray
        #[arg(long, default_value = "nexus3")]
        kind: String,
        /// Usages: source, target, search (repeatable)
        #[arg(long = "target", value_name = "USAGE")]
        targets: Vec<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Inner repository name (Nexus), or subject/repo (Bintray)
        #[arg(long)]
        repository: Option<String>,
    },
    /// Remove a repository by name
    Remove { name: String },
}
