//! Coarse format categories.
//!
//! Category names are part of the wire contract (clients group options by
//! them), including the historical `archieves` spelling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category name such as `image` or `videos`.
///
/// Any string is representable: catalogs may declare their own categories,
/// and resolving an unknown category is a valid (empty) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const IMAGE: &'static str = "image";
    pub const DOCUMENT: &'static str = "document";
    pub const VIDEOS: &'static str = "videos";
    pub const AUDIO: &'static str = "audio";
    pub const ARCHIVES: &'static str = "archieves";
    pub const PRESENTATIONS: &'static str = "presentations";
    pub const SPREADSHEETS: &'static str = "spreadsheets";
    pub const EBOOK: &'static str = "ebook";
    /// Fallback for anything that cannot be classified.
    pub const BINARY: &'static str = "binary";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn binary() -> Self {
        Self::new(Self::BINARY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_binary(&self) -> bool {
        self.0 == Self::BINARY
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for Category {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Category {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
