//! The [`ObjectStore`] trait: a flat, path-addressed blob store with public
//! URLs, modelled after a cloud storage bucket.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use ca_core::{Error, Result};

/// Prefix under which raw uploads are stored.
pub const UPLOADS_PREFIX: &str = "public_uploads/";

/// Prefix under which conversion results are stored.
pub const CONVERSIONS_PREFIX: &str = "public_conversions/";

/// Listing entry for a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    /// Object path relative to the store root, `/` separated.
    pub name: String,
    pub created: DateTime<Utc>,
    pub size: u64,
}

/// Outcome of a successful [`ObjectStore::put`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub path: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` at `path`, replacing any existing object.
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<StoredObject>;

    /// Read the object at `path`; [`Error::NotFound`] if absent.
    async fn get(&self, path: &str) -> Result<Bytes>;

    /// All objects whose path starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>>;

    /// Remove the object at `path`. Returns `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool>;

    /// Publicly readable URL of `path`.
    fn public_url(&self, path: &str) -> String;

    /// Inverse of [`public_url`](Self::public_url) for URLs this store owns.
    fn path_from_url(&self, url: &str) -> Option<String>;
}

/// Reject empty, absolute and parent-escaping object paths.
pub fn validate_object_path(path: &str) -> Result<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.contains('\0')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if invalid {
        return Err(Error::Validation(format!("invalid object path: {path:?}")));
    }
    Ok(())
}

/// Make an arbitrary client-supplied file name safe to embed in an object
/// path: separators and control characters become `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_paths() {
        assert!(validate_object_path("public_uploads/1_a.png").is_ok());
        assert!(validate_object_path("public_conversions/anonymous-1/a_1234abcd.pdf").is_ok());
    }

    #[test]
    fn rejects_escaping_paths() {
        for bad in ["", "/etc/passwd", "a/../../b", "a//b", "./a", "a\\b", "dir/"] {
            assert!(validate_object_path(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("my photo.png"), "my photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("a\\b:c"), "a_b_c");
        assert_eq!(sanitize_file_name(".."), "file");
        assert_eq!(sanitize_file_name(""), "file");
    }
}
