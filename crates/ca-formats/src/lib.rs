//! ca-formats: format catalog, file classification and conversion options.
//!
//! Everything here is synchronous and infallible once a [`FormatRegistry`]
//! has been built; only catalog loading can fail.

pub mod catalog;
pub mod category;
pub mod classify;
pub mod index;
pub mod mime;
pub mod option;
pub mod registry;
pub mod resolve;

pub use catalog::{FormatCatalog, FormatDescriptor};
pub use category::Category;
pub use classify::{category_from_mime, classify, extension_of};
pub use index::{ExtensionCollision, ExtensionIndex};
pub use mime::{content_type_for, mime_from_name};
pub use option::ConversionOption;
pub use registry::{ConversionOptions, FormatRegistry};
pub use resolve::{resolve, CrossCategoryRules, CrossRule};
