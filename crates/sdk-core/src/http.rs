//! HTTP client with an in-memory response cache.
//!
//! All repository traffic goes through this client: GETs for POMs,
//! metadata and search queries (cached per URL), HEAD probes for
//! skip-if-present uploads, PUT/DELETE against target repositories.

use crate::error::{Result, SdkError};
use crate::repository::Authentication;
use bytes::Bytes;
use dashmap::DashMap;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("cuba-sdk/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpClient {
    client: reqwest::Client,
    cache: DashMap<String, Bytes>,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            cache: DashMap::new(),
        }
    }

    fn apply_auth(
        builder: reqwest::RequestBuilder,
        auth: Option<&Authentication>,
    ) -> reqwest::RequestBuilder {
        match auth {
            Some(a) => builder.basic_auth(&a.username, Some(&a.password)),
            None => builder,
        }
    }

    /// GET returning the body, `Ok(None)` when the server reports the
    /// resource absent (404/410).
    pub async fn get_bytes(
        &self,
        url: &str,
        auth: Option<&Authentication>,
    ) -> Result<Option<Bytes>> {
        let response = Self::apply_auth(self.client.get(url), auth)
            .send()
            .await
            .map_err(|e| SdkError::http(url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SdkError::status(url, status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| SdkError::http(url, e))?;
        Ok(Some(body))
    }

    /// GET with per-URL caching of successful responses. Misses (404) are
    /// not cached, so a later upload is observed.
    pub async fn get_cached(
        &self,
        url: &str,
        auth: Option<&Authentication>,
    ) -> Result<Option<Bytes>> {
        if let Some(hit) = self.cache.get(url) {
            debug!(%url, "http cache hit");
            return Ok(Some(hit.clone()));
        }
        let body = self.get_bytes(url, auth).await?;
        if let Some(ref bytes) = body {
            self.cache.insert(url.to_string(), bytes.clone());
        }
        Ok(body)
    }

    /// GET with `Accept: application/json`, cached like [`Self::get_cached`].
    /// The search APIs (Nexus lucene in particular) content-negotiate.
    pub async fn get_json(
        &self,
        url: &str,
        auth: Option<&Authentication>,
    ) -> Result<Option<Bytes>> {
        if let Some(hit) = self.cache.get(url) {
            return Ok(Some(hit.clone()));
        }

        let response = Self::apply_auth(self.client.get(url), auth)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SdkError::http(url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SdkError::status(url, status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| SdkError::http(url, e))?;
        self.cache.insert(url.to_string(), body.clone());
        Ok(Some(body))
    }

    pub async fn get_text(
        &self,
        url: &str,
        auth: Option<&Authentication>,
    ) -> Result<Option<String>> {
        let body = self.get_cached(url, auth).await?;
        Ok(body.map(|b| String::from_utf8_lossy(&b).into_owned()))
    }

    /// HEAD probe: does the resource exist on the server?
    pub async fn exists(&self, url: &str, auth: Option<&Authentication>) -> Result<bool> {
        let response = Self::apply_auth(self.client.head(url), auth)
            .send()
            .await
            .map_err(|e| SdkError::http(url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Ok(false);
        }
        Err(SdkError::status(url, status.as_u16()))
    }

    pub async fn put_bytes(
        &self,
        url: &str,
        body: Vec<u8>,
        auth: Option<&Authentication>,
    ) -> Result<()> {
        let response = Self::apply_auth(self.client.put(url), auth)
            .body(body)
            .send()
            .await
            .map_err(|e| SdkError::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::status(url, status.as_u16()));
        }
        Ok(())
    }

    /// DELETE; an already-absent resource is not an error.
    pub async fn delete(&self, url: &str, auth: Option<&Authentication>) -> Result<()> {
        let response = Self::apply_auth(self.client.delete(url), auth)
            .send()
            .await
            .map_err(|e| SdkError::http(url, e))?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(SdkError::status(url, status.as_u16()))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
