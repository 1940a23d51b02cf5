//! The format catalog: known target formats grouped by category.
//!
//! A catalog is loaded once at startup (from the embedded `formats.json` or a
//! configured file) and then shared read-only. Category declaration order is
//! preserved because it decides both option display order and which category
//! wins when two categories list the same extension.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use ca_core::{Error, Result};

/// Catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/formats.json");

/// One known target format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Short display label, e.g. `PNG`.
    #[serde(rename = "abbr")]
    pub abbreviation: String,
    /// Lowercase extensions including the dot; the first is canonical.
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FormatDescriptor {
    pub fn new(abbreviation: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The default target extension for this format.
    pub fn canonical_extension(&self) -> &str {
        // Loading rejects empty extension lists.
        self.extensions.first().map(String::as_str).unwrap_or_default()
    }

    /// Case-insensitive membership test.
    pub fn has_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extensions.iter().any(|e| *e == extension)
    }
}

/// Ordered mapping from category name to its formats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatCatalog {
    categories: IndexMap<String, Vec<FormatDescriptor>>,
}

impl FormatCatalog {
    /// An empty catalog; populate with [`with_category`](Self::with_category).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append (or replace, keeping its position) a category.
    pub fn with_category(
        mut self,
        category: impl Into<String>,
        formats: Vec<FormatDescriptor>,
    ) -> Self {
        self.categories.insert(category.into(), formats);
        self
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| Error::Validation(format!("format catalog parse error: {e}")))?;
        catalog.normalized()
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CATALOG).expect("built-in format catalog is valid")
    }

    /// Load from `path`, or fall back to the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let catalog = Self::from_json(&json)?;
                tracing::info!(
                    path = %path.display(),
                    categories = catalog.len(),
                    "Loaded format catalog"
                );
                Ok(catalog)
            }
            None => Ok(Self::builtin()),
        }
    }

    /// Lowercase every extension and reject descriptors without one.
    fn normalized(mut self) -> Result<Self> {
        for (category, formats) in self.categories.iter_mut() {
            for format in formats.iter_mut() {
                if format.extensions.is_empty() {
                    return Err(Error::Validation(format!(
                        "format {} in category {category} has no extensions",
                        format.abbreviation
                    )));
                }
                for ext in format.extensions.iter_mut() {
                    *ext = ext.to_lowercase();
                }
            }
        }
        Ok(self)
    }

    /// Formats of `category` in catalog order; empty for unknown categories.
    pub fn formats(&self, category: &str) -> &[FormatDescriptor] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[FormatDescriptor])> {
        self.categories
            .iter()
            .map(|(name, formats)| (name.as_str(), formats.as_slice()))
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of format descriptors across all categories.
    pub fn format_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = FormatCatalog::builtin();
        let names: Vec<&str> = catalog.categories().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                Category::IMAGE,
                Category::DOCUMENT,
                Category::VIDEOS,
                Category::AUDIO,
                Category::ARCHIVES,
                Category::PRESENTATIONS,
                Category::SPREADSHEETS,
                Category::EBOOK,
            ]
        );
        assert!(catalog.format_count() > 40);
    }

    #[test]
    fn builtin_extensions_are_lowercase_dotted() {
        let catalog = FormatCatalog::builtin();
        for (_, formats) in catalog.categories() {
            for format in formats {
                assert!(!format.extensions.is_empty());
                for ext in &format.extensions {
                    assert!(ext.starts_with('.'), "{ext} should start with a dot");
                    assert_eq!(*ext, ext.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn preserves_declaration_order() {
        let catalog =
            FormatCatalog::from_json(r#"{"zeta": [{"abbr": "Z", "extensions": [".z"]}], "alpha": []}"#)
                .unwrap();
        let names: Vec<&str> = catalog.categories().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn lowercases_extensions_on_load() {
        let catalog =
            FormatCatalog::from_json(r#"{"image": [{"abbr": "PNG", "extensions": [".PNG"]}]}"#)
                .unwrap();
        assert_eq!(catalog.formats("image")[0].extensions, vec![".png"]);
    }

    #[test]
    fn rejects_empty_extension_list() {
        let err = FormatCatalog::from_json(r#"{"image": [{"abbr": "PNG", "extensions": []}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("PNG"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(FormatCatalog::from_json("[1, 2]").is_err());
    }

    #[test]
    fn unknown_category_has_no_formats() {
        assert!(FormatCatalog::builtin().formats("holograms").is_empty());
    }

    #[test]
    fn descriptor_helpers() {
        let jpg = FormatDescriptor::new("JPG", &[".JPG", ".jpeg"]).with_description("JPEG");
        assert_eq!(jpg.canonical_extension(), ".jpg");
        assert!(jpg.has_extension(".JPEG"));
        assert!(!jpg.has_extension(".png"));
        assert_eq!(jpg.description.as_deref(), Some("JPEG"));
    }

    #[test]
    fn with_category_replaces_in_place() {
        let catalog = FormatCatalog::new()
            .with_category("a", vec![])
            .with_category("b", vec![])
            .with_category("a", vec![FormatDescriptor::new("X", &[".x"])]);
        let names: Vec<&str> = catalog.categories().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(catalog.formats("a").len(), 1);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formats.json");
        std::fs::write(&path, r#"{"audio": [{"abbr": "MP3", "extensions": [".mp3"]}]}"#).unwrap();
        let catalog = FormatCatalog::load(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.formats("audio")[0].abbreviation, "MP3");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = FormatCatalog::load(Some(Path::new("/nonexistent/formats.json"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
