//! Search trait and shared result types.

use crate::error::Result;
use async_trait::async_trait;
use sdk_core::{Classifier, HttpClient, MvnArtifact, Repository, RepositoryKind};
use std::sync::Arc;

/// One artifact found by a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub group_id: String,
    pub artifact_id: String,
    pub latest_version: Option<String>,
}

impl SearchHit {
    /// Canonical `group:artifact` name.
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

/// Query interface over one repository.
///
/// Every backend is a thin HTTP (or filesystem) query that normalizes
/// responses into sdk-core types. Backends never panic on malformed
/// responses; they return errors the caller downgrades to "not found"
/// where the workflow allows it.
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    /// The repository this searcher queries.
    fn repository(&self) -> &Repository;

    /// All known versions of `group:artifact`, newest first.
    async fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>>;

    /// Classifiers available for an exact coordinate.
    async fn classifiers(&self, artifact: &MvnArtifact) -> Result<Vec<Classifier>>;

    /// Artifacts matching a free-form query, up to `limit`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// Builds the searcher matching the repository kind.
pub fn searcher_for(repository: Repository, http: Arc<HttpClient>) -> Box<dyn RepositorySearch> {
    match repository.kind {
        RepositoryKind::Local => Box::new(crate::local::LocalSearch::new(repository)),
        RepositoryKind::Nexus2 => Box::new(crate::nexus2::Nexus2Search::new(repository, http)),
        RepositoryKind::Nexus3 => Box::new(crate::nexus3::Nexus3Search::new(repository, http)),
        RepositoryKind::Bintray => Box::new(crate::bintray::BintraySearch::new(repository, http)),
    }
}

/// Derives the classifier from a repository file name, given the
/// artifact id and version the file belongs to.
///
/// `lib-1.0-sources.jar` -> `sources:jar`, `lib-1.0.pom` -> `pom`.
/// Returns `None` for foreign files (checksums, signatures, metadata).
pub fn classifier_from_file_name(
    file_name: &str,
    artifact_id: &str,
    version: &str,
) -> Option<Classifier> {
    let stem = format!("{artifact_id}-{version}");
    let rest = file_name.strip_prefix(&stem)?;

    // Checksum/signature suffixes are not artifact variants.
    for skip in [".md5", ".sha1", ".sha256", ".sha512", ".asc"] {
        if rest.ends_with(skip) {
            return None;
        }
    }

    if let Some(extension) = rest.strip_prefix('.') {
        if extension.is_empty() {
            return None;
        }
        return Some(Classifier::new("", extension));
    }
    if let Some(tail) = rest.strip_prefix('-') {
        let (name, extension) = tail.rsplit_once('.')?;
        if name.is_empty() || extension.is_empty() {
            return None;
        }
        return Some(Classifier::new(name, extension));
    }
    None
}
