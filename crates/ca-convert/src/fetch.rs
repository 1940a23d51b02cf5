//! Reading conversion sources from wherever the client points.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use bytes::Bytes;

use ca_core::{Error, Result};
use ca_storage::ObjectStore;

/// Resolves a `fileUrl` to bytes.
///
/// In order of precedence: inline `data:` URLs, URLs owned by the local
/// object store, and plain HTTP(S) downloads.
#[derive(Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
    store: Arc<dyn ObjectStore>,
}

impl SourceFetcher {
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client error: {e}")))?;
        Ok(Self { http, store })
    }

    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        if url.starts_with("data:") {
            return decode_data_url(url);
        }

        if let Some(path) = self.store.path_from_url(url) {
            tracing::debug!(path = %path, "Reading source from object store");
            return self.store.get(&path).await;
        }

        self.download(url).await
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        tracing::debug!(url, "Downloading source");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("GET {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Fetch(format!("GET {url} returned {}", resp.status())));
        }

        resp.bytes()
            .await
            .map_err(|e| Error::Fetch(format!("reading {url} failed: {e}")))
    }
}

/// Decode the base64 payload following the first comma of a `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Bytes> {
    let (_, payload) = url
        .split_once(',')
        .ok_or_else(|| Error::Validation("data URL has no payload".into()))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|e| Error::Validation(format!("data URL payload is not valid base64: {e}")))
}
