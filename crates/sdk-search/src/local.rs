//! Local searcher: scans a Maven-layout directory.

use crate::error::Result;
use crate::types::{RepositorySearch, SearchHit, classifier_from_file_name};
use async_trait::async_trait;
use sdk_core::version::compare_versions;
use sdk_core::{Classifier, MvnArtifact, Repository};
use std::fs;
use std::path::PathBuf;

pub struct LocalSearch {
    repository: Repository,
}

impl LocalSearch {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    fn artifact_root(&self, group_id: &str, artifact_id: &str) -> Option<PathBuf> {
        let root = self.repository.local_path()?;
        Some(root.join(group_id.replace('.', "/")).join(artifact_id))
    }
}

#[async_trait]
impl RepositorySearch for LocalSearch {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>> {
        let Some(dir) = self.artifact_root(group_id, artifact_id) else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions: Vec<String> = Vec::new();
        for entry in fs::read_dir(dir)?.flatten() {
            if entry.path().is_dir() {
                versions.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        versions.sort_by(|a, b| compare_versions(b, a));
        Ok(versions)
    }

    async fn classifiers(&self, artifact: &MvnArtifact) -> Result<Vec<Classifier>> {
        let Some(dir) = self
            .artifact_root(&artifact.group_id, &artifact.artifact_id)
            .map(|d| d.join(&artifact.version))
        else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut classifiers: Vec<Classifier> = Vec::new();
        for entry in fs::read_dir(dir)?.flatten() {
            if !entry.path().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(classifier) =
                classifier_from_file_name(&file_name, &artifact.artifact_id, &artifact.version)
            {
                if !classifiers.contains(&classifier) {
                    classifiers.push(classifier);
                }
            }
        }
        classifiers.sort();
        Ok(classifiers)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        // Local search only answers exact group:artifact queries; walking
        // the whole tree for keyword matches is not worth the I/O.
        let Some((group_id, artifact_id)) = query.split_once(':') else {
            return Ok(Vec::new());
        };
        let versions = self.versions(group_id, artifact_id).await?;
        if versions.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![SearchHit {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            latest_version: versions.first().cloned(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk_core::RepositoryKind;
    use std::path::Path;

    fn seed_repo(root: &Path) {
        for (version, files) in [
            ("1.0", vec!["lib-1.0.pom", "lib-1.0.jar"]),
            (
                "2.0",
                vec!["lib-2.0.pom", "lib-2.0.jar", "lib-2.0-sources.jar", "lib-2.0.jar.sha1"],
            ),
        ] {
            let dir = root.join("org/example/lib").join(version);
            fs::create_dir_all(&dir).unwrap();
            for file in files {
                fs::write(dir.join(file), b"x").unwrap();
            }
        }
    }

    fn local_search(root: &Path) -> LocalSearch {
        LocalSearch::new(Repository::new(
            "m2",
            root.to_string_lossy(),
            RepositoryKind::Local,
        ))
    }

    #[tokio::test]
    async fn test_versions_sorted_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        seed_repo(tmp.path());
        let search = local_search(tmp.path());
        let versions = search.versions("org.example", "lib").await.unwrap();
        assert_eq!(versions, vec!["2.0", "1.0"]);
    }

    #[tokio::test]
    async fn test_versions_unknown_artifact_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let search = local_search(tmp.path());
        assert!(search.versions("org.example", "ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_classifiers_skip_checksums() {
        let tmp = tempfile::tempdir().unwrap();
        seed_repo(tmp.path());
        let search = local_search(tmp.path());
        let artifact = MvnArtifact::new("org.example", "lib", "2.0");
        let classifiers = search.classifiers(&artifact).await.unwrap();
        // Sorted by (name, extension): plain variants first.
        assert_eq!(
            classifiers,
            vec![Classifier::jar(), Classifier::pom(), Classifier::sources()]
        );
    }

    #[tokio::test]
    async fn test_search_exact_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        seed_repo(tmp.path());
        let search = local_search(tmp.path());

        let hits = search.search("org.example:lib", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].latest_version.as_deref(), Some("2.0"));

        assert!(search.search("keyword", 10).await.unwrap().is_empty());
    }
}
