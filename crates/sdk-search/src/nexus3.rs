//! Nexus 3 searcher (REST v1 search API with continuation tokens).

use crate::error::{Result, SearchError};
use crate::types::{RepositorySearch, SearchHit, classifier_from_file_name};
use async_trait::async_trait;
use sdk_core::version::compare_versions;
use sdk_core::{Classifier, HttpClient, MvnArtifact, Repository};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

const SEARCH_PATH: &str = "service/rest/v1/search";

/// Upper bound on continuation-token pages per query.
const MAX_PAGES: usize = 20;

pub struct Nexus3Search {
    repository: Repository,
    http: Arc<HttpClient>,
}

impl Nexus3Search {
    pub fn new(repository: Repository, http: Arc<HttpClient>) -> Self {
        Self { repository, http }
    }

    fn page_url(&self, params: &[(&str, &str)], token: Option<&str>) -> String {
        let mut url = format!("{}/{SEARCH_PATH}?", self.repository.base_url());
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
            url.push_str("&repository=");
            url.push_str(&urlencoding::encode(inner));
        }
        if let Some(token) = token {
            url.push_str("&continuationToken=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    /// Runs the query across continuation pages and concatenates items.
    async fn fetch_all(&self, params: &[(&str, &str)]) -> Result<Vec<SearchItem>> {
        let mut items = Vec::new();
        let mut token: Option<String> = None;

        for page in 0.. {
            if page == MAX_PAGES {
                warn!(
                    repository = %self.repository.name,
                    "search pagination cut off after {MAX_PAGES} pages"
                );
                break;
            }
            let url = self.page_url(params, token.as_deref());
            let Some(body) = self
                .http
                .get_json(&url, self.repository.auth.as_ref())
                .await?
            else {
                break;
            };
            let response = parse_search_response(&body, &self.repository.name)?;
            items.extend(response.items);
            match response.continuation_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl RepositorySearch for Nexus3Search {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>> {
        let items = self
            .fetch_all(&[("group", group_id), ("name", artifact_id)])
            .await?;
        let mut versions: Vec<String> = Vec::new();
        for item in items {
            if !versions.contains(&item.version) {
                versions.push(item.version);
            }
        }
        versions.sort_by(|a, b| compare_versions(b, a));
        Ok(versions)
    }

    async fn classifiers(&self, artifact: &MvnArtifact) -> Result<Vec<Classifier>> {
        let items = self
            .fetch_all(&[
                ("group", &artifact.group_id),
                ("name", &artifact.artifact_id),
                ("version", &artifact.version),
            ])
            .await?;

        let mut classifiers: Vec<Classifier> = Vec::new();
        for asset in items.iter().flat_map(|i| &i.assets) {
            let file_name = asset.path.rsplit('/').next().unwrap_or(&asset.path);
            if let Some(classifier) =
                classifier_from_file_name(file_name, &artifact.artifact_id, &artifact.version)
            {
                if !classifiers.contains(&classifier) {
                    classifiers.push(classifier);
                }
            }
        }
        Ok(classifiers)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let items = match query.split_once(':') {
            Some((group, artifact)) => {
                self.fetch_all(&[("group", group), ("name", artifact)])
                    .await?
            }
            None => self.fetch_all(&[("name", query)]).await?,
        };

        let mut hits: Vec<SearchHit> = Vec::new();
        for item in items {
            if let Some(hit) = hits
                .iter_mut()
                .find(|h| h.group_id == item.group && h.artifact_id == item.name)
            {
                let newer = hit
                    .latest_version
                    .as_deref()
                    .is_none_or(|known| compare_versions(&item.version, known).is_gt());
                if newer {
                    hit.latest_version = Some(item.version);
                }
                continue;
            }
            if hits.len() == limit {
                continue;
            }
            hits.push(SearchHit {
                group_id: item.group,
                artifact_id: item.name,
                latest_version: Some(item.version),
            });
        }
        Ok(hits)
    }
}

#[derive(Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "continuationToken", default)]
    continuation_token: Option<String>,
}

#[derive(Deserialize)]
struct SearchItem {
    group: String,
    name: String,
    version: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize)]
struct Asset {
    path: String,
}

fn parse_search_response(data: &[u8], repository: &str) -> Result<SearchResponse> {
    serde_json::from_slice(data).map_err(|source| SearchError::Response {
        repository: repository.to_string(),
        source,
    })
}
