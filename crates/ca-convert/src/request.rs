//! Wire types for a conversion request and its result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ca_core::{Error, Result};
use ca_formats::Category;

/// Options chosen by the client for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Extension of the produced file, including the dot.
    #[serde(default)]
    pub target_extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_category: Option<Category>,
    /// Engine-specific settings such as `startTime` or `makeTransparent`.
    #[serde(flatten)]
    #[schema(ignore)]
    pub settings: Map<String, Value>,
}

impl ConvertOptions {
    pub fn new(target_extension: impl Into<String>) -> Self {
        Self {
            target_extension: target_extension.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ext = &self.target_extension;
        if ext.len() < 2 || !ext.starts_with('.') {
            return Err(Error::Validation(format!(
                "targetExtension must start with '.' and name a format, got {ext:?}"
            )));
        }
        if ext.contains(|c: char| c == '/' || c == '\\') {
            return Err(Error::Validation(format!(
                "targetExtension must not contain path separators, got {ext:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Where to read the source from: a `data:` URL, a stored object URL or
    /// any HTTP(S) URL.
    pub file_url: String,
    pub file_name: String,
    pub options: ConvertOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub converted_file_url: String,
    pub converted_file_name: String,
}
