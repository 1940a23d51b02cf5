//! Filesystem-backed [`ObjectStore`].
//!
//! Objects live at `<root>/<path>`. The router serves `<root>` read-only
//! under the public base URL, which is what makes stored objects public.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use ca_core::{Error, Result};

use crate::store::{validate_object_path, ObjectMeta, ObjectStore, StoredObject};

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    /// Build a store and make sure its root directory exists.
    pub async fn open(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Result<Self> {
        let store = Self::new(root, public_base_url);
        tokio::fs::create_dir_all(&store.root).await?;
        tracing::debug!(root = %store.root.display(), "Opened local object store");
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        validate_object_path(path)?;
        Ok(self.root.join(path))
    }

    /// Remove directories left empty by a delete, stopping at the first
    /// non-empty one. Top-level prefix directories are kept.
    async fn prune_empty_parents(&self, file: &Path) {
        let mut dir = file.parent();
        while let Some(current) = dir {
            let depth = match current.strip_prefix(&self.root) {
                Ok(rel) => rel.components().count(),
                Err(_) => break,
            };
            if depth < 2 {
                break;
            }
            if let Err(e) = tokio::fs::remove_dir(current).await {
                tracing::trace!(dir = %current.display(), "Stopped pruning: {e}");
                break;
            }
            tracing::debug!(dir = %current.display(), "Removed empty directory");
            dir = current.parent();
        }
    }

    /// Relative `/`-separated object name for a file under the root.
    fn object_name(&self, file: &Path) -> Option<String> {
        let rel = file.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = rel
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<StoredObject> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::storage("put", format!("{}: {e}", parent.display())))?;
        }
        let size = bytes.len() as u64;
        tokio::fs::write(&file, &bytes)
            .await
            .map_err(|e| Error::storage("put", format!("{path}: {e}")))?;

        tracing::debug!(path, size, content_type, "Stored object");
        Ok(StoredObject {
            path: path.to_string(),
            url: self.public_url(path),
            size,
            content_type: content_type.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found("object", path))
            }
            Err(e) => Err(Error::storage("get", format!("{path}: {e}"))),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        // Only descend from the deepest directory named by the prefix.
        let start = match prefix.rfind('/') {
            Some(idx) => self.root.join(&prefix[..idx]),
            None => self.root.clone(),
        };

        let mut objects = Vec::new();
        let mut pending = vec![start];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::storage("list", format!("{}: {e}", dir.display()))),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::storage("list", e))?
            {
                let meta = entry
                    .metadata()
                    .await
                    .map_err(|e| Error::storage("list", e))?;
                let file = entry.path();
                if meta.is_dir() {
                    pending.push(file);
                    continue;
                }
                let Some(name) = self.object_name(&file) else {
                    continue;
                };
                if !name.starts_with(prefix) {
                    continue;
                }
                let created = meta
                    .created()
                    .or_else(|_| meta.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                objects.push(ObjectMeta {
                    name,
                    created,
                    size: meta.len(),
                });
            }
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let file = self.resolve(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => {
                self.prune_empty_parents(&file).await;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::storage("delete", format!("{path}: {e}"))),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        let path = url.strip_prefix(&self.public_base_url)?.strip_prefix('/')?;
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or(path);
        validate_object_path(path).ok()?;
        Some(path.to_string())
    }
}
