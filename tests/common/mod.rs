//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds a full [`AppContext`] over a
//! temporary object store and serves the router on a random port. The store's
//! public base URL points at the running server's `/files` route.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tempfile::TempDir;

use ca_convert::{PassthroughTranscoder, Transcoder};
use ca_core::config::Config;
use ca_formats::FormatRegistry;
use ca_storage::{LocalStore, ObjectStore};
use ca_server::context::AppContext;
use ca_server::router::build_router;

pub const API_KEY: &str = "test-api-key";
pub const ANON_TOKEN: &str = "anonymous-test-session";

/// Running server plus the context and storage directory behind it.
pub struct TestHarness {
    pub ctx: AppContext,
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    _dir: TempDir,
}

impl TestHarness {
    /// Default configuration with a single known API key.
    pub fn config() -> Config {
        let mut config = Config::default();
        config.auth.api_keys = vec![API_KEY.into()];
        config.cleanup.enabled = false;
        config
    }

    /// Start a server with [`TestHarness::config`].
    pub async fn start() -> Self {
        Self::start_with(Self::config()).await
    }

    /// Start a server with a custom configuration. Storage settings are
    /// overridden to point at a fresh temp dir served by this server.
    pub async fn start_with(config: Config) -> Self {
        Self::start_with_transcoder(config, Arc::new(PassthroughTranscoder)).await
    }

    /// Like [`TestHarness::start_with`] but converting with `transcoder`.
    pub async fn start_with_transcoder(mut config: Config, transcoder: Arc<dyn Transcoder>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        config.storage.root = dir.path().to_path_buf();
        config.storage.public_base_url = format!("http://{addr}/files");

        let store: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(
            config.storage.root.clone(),
            config.storage.public_base_url.clone(),
        ));
        let registry = FormatRegistry::load(config.formats.catalog_path.as_deref())
            .expect("failed to load format catalog");
        let ctx = AppContext::new(config, registry, store, transcoder)
            .expect("failed to build context");

        let app = build_router(ctx.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            ctx,
            addr,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// POST a JSON body with a bearer token.
    pub async fn post_json(
        &self,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("request failed")
    }

    /// Upload raw bytes and return the JSON upload record.
    pub async fn upload(&self, name: &str, data: &[u8]) -> serde_json::Value {
        let resp = self
            .client
            .post(self.url("/uploads"))
            .query(&[("name", name)])
            .bearer_auth(API_KEY)
            .body(data.to_vec())
            .send()
            .await
            .expect("upload failed");
        assert_eq!(resp.status(), 201);
        resp.json().await.expect("upload response is JSON")
    }
}
