//! Category classification of uploaded file names.
//!
//! Classification is total: any input, including an empty name, yields a
//! category, with [`Category::BINARY`] as the fallback.

use crate::category::Category;
use crate::index::ExtensionIndex;
use crate::mime::mime_from_name;

/// The extension of `file_name` including the dot, or `""` when it has none.
///
/// Only the final path component is considered. A name whose only dot is
/// the leading one (`.bashrc`) has no extension.
pub fn extension_of(file_name: &str) -> &str {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

/// Classify a file by its extension, falling back to its MIME type.
pub fn classify(index: &ExtensionIndex, file_name: &str, extension: &str) -> Category {
    if let Some(category) = index.lookup(extension) {
        return category.clone();
    }

    match mime_from_name(file_name) {
        Some(mime) => category_from_mime(mime),
        None => Category::binary(),
    }
}

/// Map a MIME type to a category using fixed, ordered rules.
pub fn category_from_mime(mime: &str) -> Category {
    let mime = mime.to_ascii_lowercase();
    let name = if mime.starts_with("image/") {
        Category::IMAGE
    } else if mime.starts_with("video/") {
        Category::VIDEOS
    } else if mime.starts_with("audio/") {
        Category::AUDIO
    } else if mime.contains("pdf") || mime.contains("document") {
        Category::DOCUMENT
    } else if mime.contains("spreadsheet") {
        Category::SPREADSHEETS
    } else if mime.contains("presentation") || mime.contains("powerpoint") {
        Category::PRESENTATIONS
    } else if mime.contains("archive") || mime.contains("zip") {
        Category::ARCHIVES
    } else if mime.contains("epub") {
        Category::EBOOK
    } else {
        Category::BINARY
    };
    Category::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FormatCatalog, FormatDescriptor};

    fn builtin_index() -> ExtensionIndex {
        ExtensionIndex::build(&FormatCatalog::builtin())
    }

    fn classify_name(index: &ExtensionIndex, name: &str) -> Category {
        classify(index, name, extension_of(name))
    }

    #[test]
    fn extension_of_cases() {
        assert_eq!(extension_of("photo.jpg"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("weird."), ".");
        assert_eq!(extension_of("dir.d/file"), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn known_extensions_classify_to_their_category() {
        let catalog = FormatCatalog::builtin();
        let index = ExtensionIndex::build(&catalog);
        for (category, formats) in catalog.categories() {
            for ext in formats.iter().flat_map(|f| f.extensions.iter()) {
                let name = format!("file{}", ext.to_uppercase());
                assert_eq!(classify_name(&index, &name), category, "{name}");
            }
        }
    }

    #[test]
    fn unknown_names_are_binary() {
        let index = builtin_index();
        assert!(classify_name(&index, "file").is_binary());
        assert!(classify_name(&index, "file.unknownext").is_binary());
        assert!(classify_name(&index, "").is_binary());
        assert!(classify_name(&index, ".").is_binary());
    }

    #[test]
    fn falls_back_to_mime() {
        let index = builtin_index();
        assert_eq!(classify_name(&index, "photo.jfif"), Category::IMAGE);
        assert_eq!(classify_name(&index, "clip.ogv"), Category::VIDEOS);
        assert_eq!(classify_name(&index, "tune.mid"), Category::AUDIO);
        assert_eq!(classify_name(&index, "app.jar"), Category::ARCHIVES);
        assert_eq!(classify_name(&index, "macro.docm"), Category::DOCUMENT);
        assert!(classify_name(&index, "data.json").is_binary());
    }

    #[test]
    fn uncatalogued_office_and_media_formats() {
        let index = builtin_index();
        for (name, want) in [
            ("drawing.odg", Category::DOCUMENT),
            ("letter.ott", Category::DOCUMENT),
            ("deck.potx", Category::DOCUMENT),
            ("track.mka", Category::AUDIO),
            ("track.mp2", Category::AUDIO),
            ("photo.jfif", Category::IMAGE),
        ] {
            assert_eq!(classify_name(&index, name), want, "{name}");
        }
    }

    #[test]
    fn index_wins_over_mime() {
        let catalog = FormatCatalog::new()
            .with_category("ebook", vec![FormatDescriptor::new("PDF", &[".pdf"])]);
        let index = ExtensionIndex::build(&catalog);
        assert_eq!(classify_name(&index, "book.pdf"), Category::EBOOK);
    }

    #[test]
    fn mime_rules_apply_in_order() {
        assert_eq!(category_from_mime("image/png"), Category::IMAGE);
        assert_eq!(category_from_mime("application/pdf"), Category::DOCUMENT);
        // officedocument is matched before spreadsheet
        assert_eq!(
            category_from_mime(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            Category::DOCUMENT
        );
        assert_eq!(
            category_from_mime("application/vnd.oasis.opendocument.spreadsheet"),
            Category::DOCUMENT
        );
        assert_eq!(
            category_from_mime("application/x-spreadsheet"),
            Category::SPREADSHEETS
        );
        assert_eq!(
            category_from_mime("application/vnd.ms-powerpoint"),
            Category::PRESENTATIONS
        );
        // zip is matched before epub
        assert_eq!(category_from_mime("application/epub+zip"), Category::ARCHIVES);
        assert_eq!(category_from_mime("application/x-epub"), Category::EBOOK);
        assert_eq!(category_from_mime("application/msword"), Category::BINARY);
    }
}
