//! Client for forwarding API calls to a remote conversion backend.

use std::time::Duration;

use ca_core::{Error, Result};

/// Request headers copied onto forwarded calls, besides `Authorization`.
pub const FORWARDED_HEADERS: [&str; 4] = ["cache-control", "pragma", "expires", "x-requested-with"];

#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

/// A backend reply: its status and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ProxyClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client error: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `<base>/api/<operation>` with the given headers.
    pub async fn forward(
        &self,
        operation: &str,
        headers: &[(&'static str, String)],
        body: &serde_json::Value,
    ) -> Result<ProxyReply> {
        let url = format!("{}/api/{operation}", self.base_url);
        let mut request = self.http.post(&url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        tracing::debug!(url = %url, "Forwarding request to backend");
        let resp = request
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("{url}: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Error::Upstream(format!("invalid JSON from {url}: {e}")))?;

        Ok(ProxyReply { status, body })
    }
}
