//! Bintray searcher (package search + version file listings).
//!
//! The service is long retired upstream but the API shape survives in
//! compatible registries, so the backend stays thin: two endpoints,
//! both JSON.

use crate::error::{Result, SearchError};
use crate::types::{RepositorySearch, SearchHit, classifier_from_file_name};
use async_trait::async_trait;
use sdk_core::version::compare_versions;
use sdk_core::{Classifier, HttpClient, MvnArtifact, Repository};
use serde::Deserialize;
use std::sync::Arc;

pub struct BintraySearch {
    repository: Repository,
    http: Arc<HttpClient>,
}

impl BintraySearch {
    pub fn new(repository: Repository, http: Arc<HttpClient>) -> Self {
        Self { repository, http }
    }

    fn search_url(&self, group_id: &str, artifact_id: &str) -> String {
        format!(
            "{}/search/packages/maven?g={}&a={}",
            self.repository.base_url(),
            urlencoding::encode(group_id),
            urlencoding::encode(artifact_id),
        )
    }

    /// `subject/repo` pair from the configured repository name.
    fn subject_repo(&self) -> Result<(&str, &str)> {
        self.repository
            .repository_name
            .as_deref()
            .and_then(|name| name.split_once('/'))
            .ok_or_else(|| SearchError::Misconfigured {
                repository: self.repository.name.clone(),
                what: "a 'subject/repo' repository name".into(),
            })
    }

    async fn fetch_packages(&self, group_id: &str, artifact_id: &str) -> Result<Vec<Package>> {
        let url = self.search_url(group_id, artifact_id);
        let Some(body) = self
            .http
            .get_json(&url, self.repository.auth.as_ref())
            .await?
        else {
            return Ok(Vec::new());
        };
        parse_packages(&body, &self.repository.name)
    }
}

#[async_trait]
impl RepositorySearch for BintraySearch {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>> {
        let packages = self.fetch_packages(group_id, artifact_id).await?;
        let mut versions: Vec<String> = Vec::new();
        for package in packages {
            for version in package.versions {
                if !versions.contains(&version) {
                    versions.push(version);
                }
            }
        }
        versions.sort_by(|a, b| compare_versions(b, a));
        Ok(versions)
    }

    async fn classifiers(&self, artifact: &MvnArtifact) -> Result<Vec<Classifier>> {
        let (subject, repo) = self.subject_repo()?;
        let url = format!(
            "{}/packages/{subject}/{repo}/{}/versions/{}/files",
            self.repository.base_url(),
            urlencoding::encode(&artifact.artifact_id),
            urlencoding::encode(&artifact.version),
        );
        let Some(body) = self
            .http
            .get_json(&url, self.repository.auth.as_ref())
            .await?
        else {
            return Ok(Vec::new());
        };
        let files = parse_files(&body, &self.repository.name)?;

        let mut classifiers: Vec<Classifier> = Vec::new();
        for file in files {
            if let Some(classifier) =
                classifier_from_file_name(&file.name, &artifact.artifact_id, &artifact.version)
            {
                if !classifiers.contains(&classifier) {
                    classifiers.push(classifier);
                }
            }
        }
        Ok(classifiers)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let (group, artifact) = query.split_once(':').unwrap_or(("", query));
        let packages = self.fetch_packages(group, artifact).await?;

        let mut hits: Vec<SearchHit> = Vec::new();
        for package in packages.into_iter().take(limit) {
            // system_ids carry the Maven coordinates; the package name is
            // only a fallback.
            let (group_id, artifact_id) = package
                .system_ids
                .first()
                .and_then(|id| id.split_once(':'))
                .map(|(g, a)| (g.to_string(), a.to_string()))
                .unwrap_or_else(|| (String::new(), package.name.clone()));
            hits.push(SearchHit {
                group_id,
                artifact_id,
                latest_version: package.latest_version,
            });
        }
        Ok(hits)
    }
}

#[derive(Deserialize)]
struct Package {
    name: String,
    #[serde(default)]
    latest_version: Option<String>,
    #[serde(default)]
    versions: Vec<String>,
    #[serde(default)]
    system_ids: Vec<String>,
}

#[derive(Deserialize)]
struct PackageFile {
    name: String,
}

fn parse_packages(data: &[u8], repository: &str) -> Result<Vec<Package>> {
    serde_json::from_slice(data).map_err(|source| SearchError::Response {
        repository: repository.to_string(),
        source,
    })
}

fn parse_files(data: &[u8], repository: &str) -> Result<Vec<PackageFile>> {
    serde_json::from_slice(data).map_err(|source| SearchError::Response {
        repository: repository.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk_core::RepositoryKind;

    const PACKAGES: &str = r#"[
        {
            "name": "cuba",
            "latest_version": "7.2.1",
            "versions": ["7.2.1", "7.2.0", "7.1.0"],
            "system_ids": ["com.haulmont.cuba:cuba"]
        }
    ]"#;

    const FILES: &str = r#"[
        {"name": "cuba-7.2.1.pom", "path": "com/haulmont/cuba/cuba/7.2.1/cuba-7.2.1.pom"},
        {"name": "cuba-7.2.1.jar", "path": "com/haulmont/cuba/cuba/7.2.1/cuba-7.2.1.jar"},
        {"name": "cuba-7.2.1-sources.jar", "path": "com/haulmont/cuba/cuba/7.2.1/cuba-7.2.1-sources.jar"},
        {"name": "cuba-7.2.1.jar.sha1", "path": "com/haulmont/cuba/cuba/7.2.1/cuba-7.2.1.jar.sha1"}
    ]"#;

    fn bintray_repo(url: &str) -> Repository {
        Repository::new("bintray", url, RepositoryKind::Bintray)
            .with_repository_name("cuba-platform/main")
    }

    #[test]
    fn test_parse_packages() {
        let packages = parse_packages(PACKAGES.as_bytes(), "bintray").unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].versions.len(), 3);
        assert_eq!(packages[0].system_ids[0], "com.haulmont.cuba:cuba");
    }

    #[test]
    fn test_subject_repo_requires_repository_name() {
        let repo = Repository::new("bintray", "https://api.bintray.com", RepositoryKind::Bintray);
        let search = BintraySearch::new(repo, Arc::new(HttpClient::new()));
        assert!(matches!(
            search.subject_repo(),
            Err(SearchError::Misconfigured { .. })
        ));
    }

    #[tokio::test]
    async fn test_versions() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/packages/maven")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("g".into(), "com.haulmont.cuba".into()),
                mockito::Matcher::UrlEncoded("a".into(), "cuba".into()),
            ]))
            .with_status(200)
            .with_body(PACKAGES)
            .create_async()
            .await;

        let search = BintraySearch::new(bintray_repo(&server.url()), Arc::new(HttpClient::new()));
        let versions = search.versions("com.haulmont.cuba", "cuba").await.unwrap();
        assert_eq!(versions, vec!["7.2.1", "7.2.0", "7.1.0"]);
    }

    #[tokio::test]
    async fn test_classifiers_from_files() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/packages/cuba-platform/main/cuba/versions/7.2.1/files",
            )
            .with_status(200)
            .with_body(FILES)
            .create_async()
            .await;

        let search = BintraySearch::new(bintray_repo(&server.url()), Arc::new(HttpClient::new()));
        let artifact = MvnArtifact::new("com.haulmont.cuba", "cuba", "7.2.1");
        let classifiers = search.classifiers(&artifact).await.unwrap();
        assert_eq!(
            classifiers,
            vec![Classifier::pom(), Classifier::jar(), Classifier::sources()]
        );
    }

    #[tokio::test]
    async fn test_search_uses_system_ids() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/packages/maven")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(PACKAGES)
            .create_async()
            .await;

        let search = BintraySearch::new(bintray_repo(&server.url()), Arc::new(HttpClient::new()));
        let hits = search.search("com.haulmont.cuba:cuba", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "com.haulmont.cuba:cuba");
        assert_eq!(hits[0].latest_version.as_deref(), Some("7.2.1"));
    }
}
