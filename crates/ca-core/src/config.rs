//! Application configuration types.
//!
//! The top-level [`Config`] is deserialized from JSON or TOML (chosen by the
//! file extension) and carries every sub-config. Each section defaults
//! sensibly so an empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub formats: FormatsConfig,
    pub storage: StorageConfig,
    pub cleanup: CleanupConfig,
    pub convert: ConvertConfig,
    pub proxy: ProxyConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => config,
            Err(Error::Io { source }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.rate_limit_per_minute == 0 {
            warnings.push("server.rate_limit_per_minute is 0; falling back to 300".into());
        }

        if self.auth.enabled && self.auth.api_keys.is_empty() && !self.auth.allow_anonymous {
            warnings.push(
                "auth is enabled but no api_keys are set and anonymous tokens are disabled".into(),
            );
        }

        if self.cleanup.enabled {
            if self.cleanup.retention_hours == 0 {
                warnings.push(
                    "cleanup.retention_hours is 0; every stored object will be swept".into(),
                );
            }
            if self.cleanup.interval_hours == 0 {
                warnings.push("cleanup.interval_hours is 0; falling back to 1 hour".into());
            }
        }

        if self.proxy.backend_url.is_some() && self.proxy.timeout_secs == 0 {
            warnings.push("proxy.timeout_secs is 0; proxied requests will time out".into());
        }

        if let Some(ref path) = self.formats.catalog_path {
            if !path.exists() {
                warnings.push(format!(
                    "formats.catalog_path {} does not exist",
                    path.display()
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin without credentials.
    pub cors_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub max_upload_bytes: usize,
    /// Contact address reported by `/health`.
    pub contact: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            cors_origins: Vec::new(),
            rate_limit_per_minute: 300,
            max_upload_bytes: 500 * 1024 * 1024,
            contact: "support@example.com".into(),
        }
    }
}

/// Bearer-token gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Accepted non-anonymous bearer tokens.
    pub api_keys: Vec<String>,
    /// Accept `anonymous-<id>` tokens.
    pub allow_anonymous: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_keys: Vec::new(),
            allow_anonymous: true,
        }
    }
}

/// Format catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatsConfig {
    /// JSON catalog overriding the built-in one.
    pub catalog_path: Option<PathBuf>,
}

/// Object storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
    /// URL prefix under which stored objects are publicly readable.
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/storage"),
            public_base_url: "http://localhost:8080/files".into(),
        }
    }
}

/// TTL sweep settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub enabled: bool,
    pub retention_hours: u64,
    pub interval_hours: u64,
    pub prefixes: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_hours: 24,
            interval_hours: 24,
            prefixes: vec!["public_uploads/".into(), "public_conversions/".into()],
        }
    }
}

/// Conversion executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Upper bound for downloading a source file over HTTP.
    pub fetch_timeout_secs: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 60,
        }
    }
}

/// Remote backend proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL of the remote backend; proxy routes answer 503 when unset.
    pub backend_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            timeout_secs: 60,
        }
    }
}
