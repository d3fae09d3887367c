//! Nexus 2 searcher (lucene REST API).

use crate::error::{Result, SearchError};
use crate::types::{RepositorySearch, SearchHit};
use async_trait::async_trait;
use sdk_core::version::compare_versions;
use sdk_core::{Classifier, HttpClient, MvnArtifact, Repository};
use serde::Deserialize;
use std::sync::Arc;

const LUCENE_PATH: &str = "service/local/lucene/search";

pub struct Nexus2Search {
    repository: Repository,
    http: Arc<HttpClient>,
}

impl Nexus2Search {
    pub fn new(repository: Repository, http: Arc<HttpClient>) -> Self {
        Self { repository, http }
    }

    fn query_url(&self, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{LUCENE_PATH}?", self.repository.base_url());
        let mut first = true;
        for (key, value) in params {
            if !first {
                url.push('&');
            }
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            first = false;
        }
        if let Some(ref inner) = self.repository.repository_name {
            url.push_str("&repositoryId=");
            url.push_str(&urlencoding::encode(inner));
        }
        url
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> Result<LuceneResponse> {
        let url = self.query_url(params);
        let Some(body) = self
            .http
            .get_json(&url, self.repository.auth.as_ref())
            .await?
        else {
            return Ok(LuceneResponse::default());
        };
        parse_lucene_response(&body, &self.repository.name)
    }
}

#[async_trait]
impl RepositorySearch for Nexus2Search {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>> {
        let response = self.fetch(&[("g", group_id), ("a", artifact_id)]).await?;
        Ok(collect_versions(&response))
    }

    async fn classifiers(&self, artifact: &MvnArtifact) -> Result<Vec<Classifier>> {
        let response = self
            .fetch(&[
                ("g", &artifact.group_id),
                ("a", &artifact.artifact_id),
                ("v", &artifact.version),
            ])
            .await?;
        Ok(collect_classifiers(&response))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let response = match query.split_once(':') {
            Some((group, artifact)) => self.fetch(&[("g", group), ("a", artifact)]).await?,
            None => self.fetch(&[("q", query)]).await?,
        };
        Ok(collect_hits(&response, limit))
    }
}

#[derive(Deserialize, Default, Debug)]
struct LuceneResponse {
    #[serde(default)]
    data: Vec<LuceneDoc>,
}

#[derive(Deserialize, Debug)]
struct LuceneDoc {
    #[serde(rename = "groupId")]
    group_id: String,
    #[serde(rename = "artifactId")]
    artifact_id: String,
    version: String,
    #[serde(rename = "latestRelease", default)]
    latest_release: Option<String>,
    #[serde(rename = "artifactHits", default)]
    artifact_hits: Vec<ArtifactHit>,
}

#[derive(Deserialize, Debug)]
struct ArtifactHit {
    #[serde(rename = "artifactLinks", default)]
    artifact_links: Vec<ArtifactLink>,
}

#[derive(Deserialize, Debug)]
struct ArtifactLink {
    #[serde(default)]
    classifier: Option<String>,
    extension: String,
}

fn parse_lucene_response(data: &[u8], repository: &str) -> Result<LuceneResponse> {
    serde_json::from_slice(data).map_err(|source| SearchError::Response {
        repository: repository.to_string(),
        source,
    })
}

fn collect_versions(response: &LuceneResponse) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();
    for doc in &response.data {
        if !versions.contains(&doc.version) {
            versions.push(doc.version.clone());
        }
    }
    versions.sort_by(|a, b| compare_versions(b, a));
    versions
}

fn collect_classifiers(response: &LuceneResponse) -> Vec<Classifier> {
    let mut classifiers: Vec<Classifier> = Vec::new();
    for link in response
        .data
        .iter()
        .flat_map(|d| &d.artifact_hits)
        .flat_map(|h| &h.artifact_links)
    {
        let classifier = Classifier::new(
            link.classifier.clone().unwrap_or_default(),
            link.extension.clone(),
        );
        if !classifiers.contains(&classifier) {
            classifiers.push(classifier);
        }
    }
    classifiers
}

fn collect_hits(response: &LuceneResponse, limit: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = Vec::new();
    for doc in &response.data {
        if hits
            .iter()
            .any(|h| h.group_id == doc.group_id && h.artifact_id == doc.artifact_id)
        {
            continue;
        }
        hits.push(SearchHit {
            group_id: doc.group_id.clone(),
            artifact_id: doc.artifact_id.clone(),
            latest_version: doc
                .latest_release
                .clone()
                .or_else(|| Some(doc.version.clone())),
        });
        if hits.len() == limit {
            break;
        }
    }
    hits
}
