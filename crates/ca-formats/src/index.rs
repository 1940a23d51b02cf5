//! Reverse lookup from extension to category.

use std::collections::HashMap;

use crate::catalog::FormatCatalog;
use crate::category::Category;

/// An extension claimed by more than one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCollision {
    pub extension: String,
    /// Category that held the extension before being overwritten.
    pub previous: Category,
    /// Category that holds it now.
    pub winner: Category,
}

/// Lowercase extension to category mapping.
///
/// Built by walking the catalog in declaration order. When two categories
/// list the same extension the later one wins; every such override is kept
/// in [`collisions`](Self::collisions) so callers can surface it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionIndex {
    map: HashMap<String, Category>,
    collisions: Vec<ExtensionCollision>,
}

impl ExtensionIndex {
    pub fn build(catalog: &FormatCatalog) -> Self {
        let mut map: HashMap<String, Category> = HashMap::new();
        let mut collisions = Vec::new();

        for (category, formats) in catalog.categories() {
            for ext in formats.iter().flat_map(|f| f.extensions.iter()) {
                let winner = Category::new(category);
                if let Some(previous) = map.insert(ext.to_lowercase(), winner.clone()) {
                    if previous != winner {
                        collisions.push(ExtensionCollision {
                            extension: ext.to_lowercase(),
                            previous,
                            winner,
                        });
                    }
                }
            }
        }

        Self { map, collisions }
    }

    /// Case-insensitive lookup of an extension such as `.JPG`.
    pub fn lookup(&self, extension: &str) -> Option<&Category> {
        self.map.get(&extension.to_lowercase())
    }

    pub fn collisions(&self) -> &[ExtensionCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
