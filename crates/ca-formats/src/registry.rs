//! The loaded format registry shared by every request.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ca_core::Result;

use crate::catalog::FormatCatalog;
use crate::category::Category;
use crate::classify::{classify, extension_of};
use crate::index::ExtensionIndex;
use crate::option::ConversionOption;
use crate::resolve::{resolve, CrossCategoryRules};

/// Classification result plus the options for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    pub source_category: Category,
    pub options: Vec<ConversionOption>,
}

/// Catalog, extension index and cross-category rules, built once at startup
/// and immutable afterwards.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    catalog: FormatCatalog,
    index: ExtensionIndex,
    rules: CrossCategoryRules,
}

impl FormatRegistry {
    pub fn new(catalog: FormatCatalog) -> Self {
        Self::with_rules(catalog, CrossCategoryRules::standard())
    }

    pub fn with_rules(catalog: FormatCatalog, rules: CrossCategoryRules) -> Self {
        let index = ExtensionIndex::build(&catalog);
        for collision in index.collisions() {
            tracing::warn!(
                extension = %collision.extension,
                previous = %collision.previous,
                winner = %collision.winner,
                "Extension listed in several categories; later category wins"
            );
        }
        tracing::debug!(
            categories = catalog.len(),
            formats = catalog.format_count(),
            extensions = index.len(),
            "Format registry built"
        );
        Self {
            catalog,
            index,
            rules,
        }
    }

    pub fn builtin() -> Self {
        Self::new(FormatCatalog::builtin())
    }

    /// Load the catalog at `path` (or the built-in one) and build a registry.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(FormatCatalog::load(path)?))
    }

    /// Category of `file_name`, using its own extension.
    pub fn classify(&self, file_name: &str) -> Category {
        self.classify_with(file_name, extension_of(file_name))
    }

    /// Category of `file_name` with an explicitly supplied extension.
    pub fn classify_with(&self, file_name: &str, extension: &str) -> Category {
        classify(&self.index, file_name, extension)
    }

    pub fn resolve(&self, source_category: &str, source_extension: &str) -> Vec<ConversionOption> {
        resolve(&self.catalog, &self.rules, source_category, source_extension)
    }

    /// Classify `file_name` and resolve its options in one step.
    pub fn options_for(&self, file_name: &str) -> ConversionOptions {
        let extension = extension_of(file_name);
        let source_category = self.classify_with(file_name, extension);
        let options = self.resolve(source_category.as_str(), extension);
        tracing::debug!(
            file_name,
            category = %source_category,
            options = options.len(),
            "Resolved conversion options"
        );
        ConversionOptions {
            source_category,
            options,
        }
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &ExtensionIndex {
        &self.index
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
