//! Conversion-option resolution.
//!
//! Options are produced in two passes: same-category peers in catalog order,
//! then cross-category augmentations from a per-category rule table. Order
//! is significant and nothing is sorted or deduplicated afterwards.

use std::collections::HashMap;

use crate::catalog::FormatCatalog;
use crate::category::Category;
use crate::option::ConversionOption;

/// Appends cross-category options to a partially built list.
pub type CrossRule = fn(&mut Vec<ConversionOption>);

/// Cross-category rules keyed by source category, applied in insertion order.
#[derive(Clone, Default)]
pub struct CrossCategoryRules {
    table: HashMap<&'static str, Vec<CrossRule>>,
}

impl std::fmt::Debug for CrossCategoryRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<_> = self.table.iter().map(|(k, v)| (*k, v.len())).collect();
        categories.sort();
        f.debug_struct("CrossCategoryRules")
            .field("categories", &categories)
            .finish()
    }
}

impl CrossCategoryRules {
    /// No augmentation at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules the service ships with.
    pub fn standard() -> Self {
        Self::empty()
            .add(Category::IMAGE, pdf_unless_present)
            .add(Category::IMAGE, png_sticker)
            .add(Category::VIDEOS, gif_animation)
            .add(Category::VIDEOS, mp3_audio_extract)
            .add(Category::VIDEOS, jpg_thumbnail)
            .add(Category::DOCUMENT, pdf_unless_present)
            .add(Category::SPREADSHEETS, pdf_unless_present)
            .add(Category::PRESENTATIONS, pdf_unless_present)
    }

    pub fn add(mut self, category: &'static str, rule: CrossRule) -> Self {
        self.table.entry(category).or_default().push(rule);
        self
    }

    /// Run every rule registered for `category` over `options`.
    pub fn apply(&self, category: &str, options: &mut Vec<ConversionOption>) {
        if let Some(rules) = self.table.get(category) {
            for rule in rules {
                rule(options);
            }
        }
    }
}

fn pdf_unless_present(options: &mut Vec<ConversionOption>) {
    if !options.iter().any(|o| o.target_extension == ".pdf") {
        options.push(ConversionOption::cross("PDF", ".pdf", Category::DOCUMENT).cross_category());
    }
}

fn png_sticker(options: &mut Vec<ConversionOption>) {
    options.push(ConversionOption::cross("PNG (Sticker)", ".png", Category::IMAGE).sticker());
}

fn gif_animation(options: &mut Vec<ConversionOption>) {
    options.push(
        ConversionOption::cross("GIF", ".gif", Category::IMAGE)
            .cross_category()
            .animation(),
    );
}

fn mp3_audio_extract(options: &mut Vec<ConversionOption>) {
    options.push(
        ConversionOption::cross("MP3", ".mp3", Category::AUDIO)
            .cross_category()
            .audio_extract(),
    );
}

fn jpg_thumbnail(options: &mut Vec<ConversionOption>) {
    options.push(
        ConversionOption::cross("JPG (Thumbnail)", ".jpg", Category::IMAGE)
            .cross_category()
            .thumbnail(),
    );
}

/// All conversion options for a file of `source_category` with
/// `source_extension`. Unknown categories yield an empty list.
pub fn resolve(
    catalog: &FormatCatalog,
    rules: &CrossCategoryRules,
    source_category: &str,
    source_extension: &str,
) -> Vec<ConversionOption> {
    let source_extension = source_extension.to_lowercase();
    let category = Category::new(source_category);

    let mut options: Vec<ConversionOption> = catalog
        .formats(source_category)
        .iter()
        .filter(|format| !format.extensions.iter().any(|e| *e == source_extension))
        .map(|format| ConversionOption::peer(format, &category))
        .collect();

    rules.apply(source_category, &mut options);
    options
}
