//! SDK home layout and `sdk.toml` configuration.

use anyhow::Context as _;
use sdk_core::{Repository, RepositoryKind, RepositoryTarget};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "sdk.toml";

/// The directory holding everything the sdk persists: configuration,
/// the artifact storage, the metadata store, and the log.
#[derive(Debug, Clone)]
pub struct SdkHome {
    root: PathBuf,
}

impl SdkHome {
    /// Resolution order: explicit flag, `$SDK_HOME`, `~/.cuba-sdk`.
    pub fn locate(flag: Option<PathBuf>) -> Self {
        let root = flag
            .or_else(|| std::env::var_os("SDK_HOME").map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|h| h.join(".cuba-sdk")))
            .unwrap_or_else(|| PathBuf::from(".cuba-sdk"));
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn storage_root(&self) -> PathBuf {
        self.root.join("maven")
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join("sdk-metadata.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("sdk.log")
    }
}

impl From<&Path> for SdkHome {
    fn from(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        let mut repositories = vec![Repository::maven_central()];
        // A populated local .m2 is the cheapest source there is.
        if let Some(m2) = dirs::home_dir().map(|h| h.join(".m2/repository")) {
            if m2.is_dir() {
                repositories.insert(
                    0,
                    Repository::new("local-m2", m2.to_string_lossy(), RepositoryKind::Local)
                        .with_targets(&[RepositoryTarget::Source]),
                );
            }
        }
        Self { repositories }
    }
}

impl SdkConfig {
    /// Loads the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(home: &SdkHome) -> anyhow::Result<Self> {
        let path = home.config_path();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, home: &SdkHome) -> anyhow::Result<()> {
        fs::create_dir_all(home.root())?;
        let text = toml::to_string_pretty(self)?;
        fs::write(home.config_path(), text)
            .with_context(|| format!("writing {}", home.config_path().display()))
    }

    pub fn sources(&self) -> Vec<Repository> {
        self.repositories
            .iter()
            .filter(|r| r.is_source())
            .cloned()
            .collect()
    }

    pub fn targets(&self) -> Vec<Repository> {
        self.repositories
            .iter()
            .filter(|r| r.is_target())
            .cloned()
            .collect()
    }

    pub fn search_repositories(&self) -> Vec<Repository> {
        self.repositories
            .iter()
            .filter(|r| r.is_search())
            .cloned()
            .collect()
    }

    /// Adds or replaces a repository by name.
    pub fn upsert_repository(&mut self, repository: Repository) {
        self.repositories.retain(|r| r.name != repository.name);
        self.repositories.push(repository);
    }

    /// Removes a repository by name; false when it was not configured.
    pub fn remove_repository(&mut self, name: &str) -> bool {
        let before = self.repositories.len();
        self.repositories.retain(|r| r.name != name);
        self.repositories.len() < before
    }
}

/// Parses a repository kind argument.
pub fn parse_kind(kind: &str) -> anyhow::Result<RepositoryKind> {
    match kind.to_lowercase().as_str() {
        "local" => Ok(RepositoryKind::Local),
        "nexus2" => Ok(RepositoryKind::Nexus2),
        "nexus3" => Ok(RepositoryKind::Nexus3),
        "bintray" => Ok(RepositoryKind::Bintray),
        other => anyhow::bail!("unknown repository kind '{other}'"),
    }
}

/// Parses repository usage arguments; empty input means source+search.
pub fn parse_targets(targets: &[String]) -> anyhow::Result<Vec<RepositoryTarget>> {
    if targets.is_empty() {
        return Ok(vec![RepositoryTarget::Source, RepositoryTarget::Search]);
    }
    targets
        .iter()
        .map(|t| match t.to_lowercase().as_str() {
            "source" => Ok(RepositoryTarget::Source),
            "target" => Ok(RepositoryTarget::Target),
            "search" => Ok(RepositoryTarget::Search),
            other => anyhow::bail!("unknown repository usage '{other}'"),
        })
        .collect()
}
