//! Shared application context.
//!
//! [`AppContext`] is cloned into every handler via Axum state. Everything in
//! it is immutable after startup and shared behind `Arc`s.

use std::sync::Arc;
use std::time::Duration;

use ca_convert::{ConversionService, PassthroughTranscoder, Transcoder};
use ca_core::config::Config;
use ca_core::Result;
use ca_formats::FormatRegistry;
use ca_storage::{LocalStore, ObjectStore, Sweeper};

use crate::middleware::rate_limit::{create_limiter, SharedLimiter};
use crate::proxy::ProxyClient;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub registry: Arc<FormatRegistry>,
    pub store: Arc<dyn ObjectStore>,
    pub conversions: Arc<ConversionService>,
    /// `None` when no backend is configured.
    pub proxy: Option<Arc<ProxyClient>>,
    pub limiter: SharedLimiter,
}

impl AppContext {
    /// Assemble a context from already-built parts.
    pub fn new(
        config: Config,
        registry: FormatRegistry,
        store: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Result<Self> {
        let registry = Arc::new(registry);
        let conversions = ConversionService::new(
            store.clone(),
            transcoder,
            registry.clone(),
            Duration::from_secs(config.convert.fetch_timeout_secs),
        )?;
        tracing::debug!(engine = conversions.transcoder_name(), "Conversion service ready");

        let proxy = match config.proxy.backend_url.as_deref() {
            Some(url) if !url.is_empty() => Some(Arc::new(ProxyClient::new(
                url,
                Duration::from_secs(config.proxy.timeout_secs),
            )?)),
            _ => None,
        };

        let limiter = create_limiter(config.server.rate_limit_per_minute);

        Ok(Self {
            config: Arc::new(config),
            registry,
            store,
            conversions: Arc::new(conversions),
            proxy,
            limiter,
        })
    }

    /// Load the format catalog, open the local store and use the
    /// passthrough transcoder.
    pub async fn from_config(config: Config) -> Result<Self> {
        let registry = FormatRegistry::load(config.formats.catalog_path.as_deref())?;
        let store = LocalStore::open(
            config.storage.root.clone(),
            config.storage.public_base_url.clone(),
        )
        .await?;
        tracing::info!(
            root = %config.storage.root.display(),
            public_base_url = %config.storage.public_base_url,
            "Object store ready"
        );
        Self::new(config, registry, Arc::new(store), Arc::new(PassthroughTranscoder))
    }

    /// Sweeper over this context's store, per the cleanup config.
    pub fn sweeper(&self) -> Sweeper {
        sweeper_for(&self.config, self.store.clone())
    }
}

pub fn sweeper_for(config: &Config, store: Arc<dyn ObjectStore>) -> Sweeper {
    Sweeper::new(
        store,
        Duration::from_secs(config.cleanup.retention_hours * 60 * 60),
        config.cleanup.prefixes.clone(),
    )
}
