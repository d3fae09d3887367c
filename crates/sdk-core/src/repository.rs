//! Repository descriptions: where artifacts come from and where they go.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    /// Maven-layout directory on the local filesystem.
    Local,
    Nexus2,
    Nexus3,
    Bintray,
}

/// What a repository is used for. A repository may carry several targets,
/// e.g. a Nexus instance that is both uploaded to and searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryTarget {
    /// Artifacts are downloaded from here.
    Source,
    /// Resolved artifacts are uploaded here.
    Target,
    /// Queried for existing artifacts and classifiers.
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub kind: RepositoryKind,
    #[serde(default)]
    pub targets: Vec<RepositoryTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Authentication>,
    /// Inner repository name for Nexus instances (e.g. "maven-releases").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: RepositoryKind) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind,
            targets: Vec::new(),
            auth: None,
            repository_name: None,
        }
    }

    /// Maven Central, usable as both a source and a search repository.
    pub fn maven_central() -> Self {
        Self::new(
            "central",
            "https://repo1.maven.org/maven2",
            RepositoryKind::Nexus3,
        )
        .with_targets(&[RepositoryTarget::Source, RepositoryTarget::Search])
    }

    pub fn with_targets(mut self, targets: &[RepositoryTarget]) -> Self {
        self.targets = targets.to_vec();
        self
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Authentication {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_repository_name(mut self, repository_name: impl Into<String>) -> Self {
        self.repository_name = Some(repository_name.into());
        self
    }

    pub fn is_source(&self) -> bool {
        self.targets.contains(&RepositoryTarget::Source)
    }

    pub fn is_target(&self) -> bool {
        self.targets.contains(&RepositoryTarget::Target)
    }

    pub fn is_search(&self) -> bool {
        self.targets.contains(&RepositoryTarget::Search)
    }

    /// Whether the repository lives on the local filesystem.
    pub fn is_local(&self) -> bool {
        self.kind == RepositoryKind::Local
            || self.url.starts_with("file://")
            || !self.url.contains("://")
    }

    /// Filesystem root for local repositories.
    pub fn local_path(&self) -> Option<PathBuf> {
        if !self.is_local() {
            return None;
        }
        let path = self.url.strip_prefix("file://").unwrap_or(&self.url);
        Some(PathBuf::from(path))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maven_central_defaults() {
        let repo = Repository::maven_central();
        assert!(repo.is_source());
        assert!(repo.is_search());
        assert!(!repo.is_target());
        assert!(!repo.is_local());
        assert_eq!(repo.base_url(), "https://repo1.maven.org/maven2");
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let repo = Repository::new("n", "https://nexus.example.com/repository/maven/", {
            RepositoryKind::Nexus3
        });
        assert_eq!(repo.base_url(), "https://nexus.example.com/repository/maven");
    }

    #[test]
    fn test_local_detection() {
        let file_url = Repository::new("m2", "file:///home/user/.m2/repository", {
            RepositoryKind::Local
        });
        assert!(file_url.is_local());
        assert_eq!(
            file_url.local_path().unwrap(),
            PathBuf::from("/home/user/.m2/repository")
        );

        let bare_path = Repository::new("m2", "/opt/repo", RepositoryKind::Local);
        assert!(bare_path.is_local());
        assert_eq!(bare_path.local_path().unwrap(), PathBuf::from("/opt/repo"));

        let remote = Repository::new("r", "https://repo.example.com", RepositoryKind::Nexus2);
        assert!(!remote.is_local());
        assert!(remote.local_path().is_none());
    }

    #[test]
    fn test_auth_builder() {
        let repo = Repository::new("nexus", "http://localhost:8081", RepositoryKind::Nexus3)
            .with_auth("admin", "admin123")
            .with_repository_name("maven-releases")
            .with_targets(&[RepositoryTarget::Target]);
        assert!(repo.is_target());
        assert_eq!(repo.auth.as_ref().unwrap().username, "admin");
        assert_eq!(repo.repository_name.as_deref(), Some("maven-releases"));
    }

    #[test]
    fn test_serde_omits_empty_auth() {
        let repo = Repository::maven_central();
        let json = serde_json::to_string(&repo).unwrap();
        assert!(!json.contains("auth"));
        let back: Repository = serde_json::from_str(&json).unwrap();
        assert_eq!(repo, back);
    }
}
