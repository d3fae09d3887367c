//! Artifact transfer: resolve POMs, download variants into local storage,
//! upload to target repositories, delete from them.
//!
//! Sources are tried in configuration order; the local storage acts as
//! the first resolver, so nothing is fetched twice.

use crate::error::{MavenError, Result};
use crate::layout;
use crate::pom::{Pom, parse_pom};
use crate::storage::LocalStorage;
use sdk_core::{Classifier, HttpClient, MvnArtifact, Repository};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    /// The target already had the file.
    Skipped,
}

pub struct ArtifactManager {
    http: Arc<HttpClient>,
    storage: LocalStorage,
    sources: Vec<Repository>,
}

impl ArtifactManager {
    /// `sources` is the ordered list of repositories to download from.
    pub fn new(http: Arc<HttpClient>, storage: LocalStorage, sources: Vec<Repository>) -> Self {
        Self {
            http,
            storage,
            sources,
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn sources(&self) -> &[Repository] {
        &self.sources
    }

    async fn fetch_from(
        &self,
        repository: &Repository,
        artifact: &MvnArtifact,
        classifier: &Classifier,
    ) -> Result<Option<Vec<u8>>> {
        if let Some(root) = repository.local_path() {
            let path = root.join(layout::file_path(artifact, classifier));
            if path.is_file() {
                return Ok(Some(fs::read(path)?));
            }
            return Ok(None);
        }
        let url = layout::file_url(repository, artifact, classifier);
        let body = self
            .http
            .get_bytes(&url, repository.auth.as_ref())
            .await?;
        Ok(body.map(|b| b.to_vec()))
    }

    /// Downloads one variant into local storage, trying sources in order.
    /// Returns the storage path, or `None` when no source has the file.
    pub async fn download(
        &self,
        artifact: &MvnArtifact,
        classifier: &Classifier,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = self.storage.get(artifact, classifier) {
            return Ok(Some(path));
        }
        for repository in &self.sources {
            if let Some(data) = self.fetch_from(repository, artifact, classifier).await? {
                debug!(
                    artifact = %artifact,
                    classifier = %classifier,
                    repository = %repository.name,
                    "downloaded"
                );
                return Ok(Some(self.storage.put(artifact, classifier, &data)?));
            }
        }
        Ok(None)
    }

    /// Fetches and reads the POM for a coordinate.
    pub async fn resolve_pom_text(&self, artifact: &MvnArtifact) -> Result<Option<String>> {
        match self.download(artifact, &Classifier::pom()).await? {
            Some(path) => Ok(Some(fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    /// Fetches and parses the POM for a coordinate. `Ok(None)` when no
    /// configured source has it.
    pub async fn resolve_pom(&self, artifact: &MvnArtifact) -> Result<Option<Pom>> {
        match self.resolve_pom_text(artifact).await? {
            Some(text) => Ok(Some(parse_pom(&text)?)),
            None => Ok(None),
        }
    }

    /// Uploads one stored variant to a target repository, skipping files
    /// the target already has.
    pub async fn upload(
        &self,
        artifact: &MvnArtifact,
        classifier: &Classifier,
        target: &Repository,
    ) -> Result<UploadOutcome> {
        let source_path =
            self.storage
                .get(artifact, classifier)
                .ok_or_else(|| MavenError::NotInStorage {
                    coordinates: artifact.coordinates(),
                    file: artifact.file_name(classifier),
                })?;

        if let Some(root) = target.local_path() {
            let dest = root.join(layout::file_path(artifact, classifier));
            if dest.is_file() {
                return Ok(UploadOutcome::Skipped);
            }
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&source_path, &dest)?;
            info!(artifact = %artifact, classifier = %classifier, target = %target.name, "uploaded");
            return Ok(UploadOutcome::Uploaded);
        }

        let url = layout::file_url(target, artifact, classifier);
        if self.http.exists(&url, target.auth.as_ref()).await? {
            return Ok(UploadOutcome::Skipped);
        }
        let data = fs::read(&source_path)?;
        self.http.put_bytes(&url, data, target.auth.as_ref()).await?;
        info!(artifact = %artifact, classifier = %classifier, target = %target.name, "uploaded");
        Ok(UploadOutcome::Uploaded)
    }

    /// Removes every variant of the artifact from local storage.
    pub fn remove_local(&self, artifact: &MvnArtifact) -> Result<bool> {
        self.storage.remove_artifact(artifact)
    }

    /// Deletes the artifact's files from a target repository: the POM
    /// plus every classifier recorded on the artifact.
    pub async fn remove_remote(&self, artifact: &MvnArtifact, target: &Repository) -> Result<()> {
        if let Some(root) = target.local_path() {
            let dir = root.join(layout::artifact_dir(
                &artifact.group_id,
                &artifact.artifact_id,
                &artifact.version,
            ));
            if dir.is_dir() {
                fs::remove_dir_all(dir)?;
            }
            return Ok(());
        }

        let mut classifiers: Vec<Classifier> = artifact.classifiers.iter().cloned().collect();
        if !classifiers.contains(&Classifier::pom()) {
            classifiers.push(Classifier::pom());
        }
        for classifier in &classifiers {
            let url = layout::file_url(target, artifact, classifier);
            self.http.delete(&url, target.auth.as_ref()).await?;
        }
        info!(artifact = %artifact, target = %target.name, "removed from target");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk_core::{RepositoryKind, RepositoryTarget};

    fn source_repo(url: &str) -> Repository {
        Repository::new("test-source", url, RepositoryKind::Nexus3)
            .with_targets(&[RepositoryTarget::Source])
    }

    fn manager(tmp: &tempfile::TempDir, sources: Vec<Repository>) -> ArtifactManager {
        ArtifactManager::new(
            Arc::new(HttpClient::new()),
            LocalStorage::new(tmp.path().join("maven")),
            sources,
        )
    }

    fn artifact() -> MvnArtifact {
        MvnArtifact::new("org.example", "lib", "1.0")
    }

    #[tokio::test]
    async fn test_download_stores_and_caches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/org/example/lib/1.0/lib-1.0.jar")
            .with_status(200)
            .with_body("jar bytes")
            .expect(1)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![source_repo(&server.url())]);

        let path = mgr.download(&artifact(), &Classifier::jar()).await.unwrap().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"jar bytes");

        // Second download is served from storage.
        mgr.download(&artifact(), &Classifier::jar()).await.unwrap().unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_fallback_order() {
        let mut first = mockito::Server::new_async().await;
        let _miss = first
            .mock("GET", "/org/example/lib/1.0/lib-1.0.jar")
            .with_status(404)
            .create_async()
            .await;
        let mut second = mockito::Server::new_async().await;
        let _hit = second
            .mock("GET", "/org/example/lib/1.0/lib-1.0.jar")
            .with_status(200)
            .with_body("from second")
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(
            &tmp,
            vec![source_repo(&first.url()), source_repo(&second.url())],
        );

        let path = mgr.download(&artifact(), &Classifier::jar()).await.unwrap().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"from second");
    }

    #[tokio::test]
    async fn test_download_not_found_anywhere() {
        let mut server = mockito::Server::new_async().await;
        let _miss = server
            .mock("GET", "/org/example/lib/1.0/lib-1.0-sources.jar")
            .with_status(404)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![source_repo(&server.url())]);
        assert!(
            mgr.download(&artifact(), &Classifier::sources())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_download_from_local_source() {
        let repo_dir = tempfile::tempdir().unwrap();
        let file = repo_dir.path().join("org/example/lib/1.0/lib-1.0.jar");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"local jar").unwrap();

        let local = Repository::new(
            "m2",
            repo_dir.path().to_string_lossy(),
            RepositoryKind::Local,
        )
        .with_targets(&[RepositoryTarget::Source]);

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![local]);
        let path = mgr.download(&artifact(), &Classifier::jar()).await.unwrap().unwrap();
        assert_eq!(fs::read(path).unwrap(), b"local jar");
    }

    #[tokio::test]
    async fn test_resolve_pom() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/org/example/lib/1.0/lib-1.0.pom")
            .with_status(200)
            .with_body(
                r"<project>
  <groupId>org.example</groupId>
  <artifactId>lib</artifactId>
  <version>1.0</version>
</project>",
            )
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![source_repo(&server.url())]);
        let pom = mgr.resolve_pom(&artifact()).await.unwrap().unwrap();
        assert_eq!(pom.artifact_id.as_deref(), Some("lib"));

        let missing = MvnArtifact::new("org.example", "nothing", "9.9");
        let _miss = server
            .mock("GET", "/org/example/nothing/9.9/nothing-9.9.pom")
            .with_status(404)
            .create_async()
            .await;
        assert!(mgr.resolve_pom(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upload_put_and_skip() {
        let mut server = mockito::Server::new_async().await;
        let head_miss = server
            .mock("HEAD", "/org/example/lib/1.0/lib-1.0.jar")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/org/example/lib/1.0/lib-1.0.jar")
            .match_body("jar bytes")
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![]);
        mgr.storage().put(&artifact(), &Classifier::jar(), b"jar bytes").unwrap();

        let target = Repository::new("nexus", server.url(), RepositoryKind::Nexus3)
            .with_targets(&[RepositoryTarget::Target]);

        let outcome = mgr.upload(&artifact(), &Classifier::jar(), &target).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Uploaded);
        head_miss.assert_async().await;
        put.assert_async().await;

        let _head_hit = server
            .mock("HEAD", "/org/example/lib/1.0/lib-1.0.jar")
            .with_status(200)
            .create_async()
            .await;
        let outcome = mgr.upload(&artifact(), &Classifier::jar(), &target).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_upload_to_local_target() {
        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![]);
        mgr.storage().put(&artifact(), &Classifier::jar(), b"data").unwrap();

        let target_dir = tempfile::tempdir().unwrap();
        let target = Repository::new(
            "local-target",
            format!("file://{}", target_dir.path().display()),
            RepositoryKind::Local,
        )
        .with_targets(&[RepositoryTarget::Target]);

        let outcome = mgr.upload(&artifact(), &Classifier::jar(), &target).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Uploaded);
        assert!(
            target_dir
                .path()
                .join("org/example/lib/1.0/lib-1.0.jar")
                .is_file()
        );

        let outcome = mgr.upload(&artifact(), &Classifier::jar(), &target).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_upload_requires_stored_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![]);
        let target = Repository::new("nexus", "http://localhost:1", RepositoryKind::Nexus3);

        let err = mgr.upload(&artifact(), &Classifier::jar(), &target).await.unwrap_err();
        assert!(matches!(err, MavenError::NotInStorage { .. }));
    }

    #[tokio::test]
    async fn test_remove_remote_deletes_all_variants() {
        let mut server = mockito::Server::new_async().await;
        let del_jar = server
            .mock("DELETE", "/org/example/lib/1.0/lib-1.0.jar")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let del_pom = server
            .mock("DELETE", "/org/example/lib/1.0/lib-1.0.pom")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mgr = manager(&tmp, vec![]);
        let target = Repository::new("nexus", server.url(), RepositoryKind::Nexus3);

        let art = artifact().with_classifier(Classifier::jar());
        mgr.remove_remote(&art, &target).await.unwrap();
        del_jar.assert_async().await;
        del_pom.assert_async().await;
    }
}
