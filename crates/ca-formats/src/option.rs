//! Conversion options offered to clients.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::catalog::FormatDescriptor;
use crate::category::Category;

/// Longest animation clip an executor accepts, in seconds.
pub const MAX_ANIMATION_SECS: f64 = 30.0;

/// Default animation clip length, in seconds.
pub const DEFAULT_ANIMATION_SECS: f64 = 10.0;

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// A single target a file may be converted to.
///
/// Flags are serialized only when set, so a plain same-category option is
/// just `{abbr, ext, category, description}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConversionOption {
    #[serde(rename = "abbr")]
    pub abbreviation: String,
    #[serde(rename = "ext")]
    pub target_extension: String,
    /// Category of the produced file.
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_cross_category: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_sticker: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_animation: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_audio_extract: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_thumbnail: bool,
}

impl ConversionOption {
    /// Same-category option targeting the descriptor's canonical extension.
    pub fn peer(descriptor: &FormatDescriptor, category: &Category) -> Self {
        Self {
            abbreviation: descriptor.abbreviation.clone(),
            target_extension: descriptor.canonical_extension().to_string(),
            category: category.clone(),
            description: Some(descriptor.description.clone().unwrap_or_default()),
            is_cross_category: false,
            is_sticker: false,
            is_animation: false,
            is_audio_extract: false,
            is_thumbnail: false,
        }
    }

    /// Option with no flags set; chain the flag builders below.
    pub fn cross(
        abbreviation: impl Into<String>,
        target_extension: impl Into<String>,
        category: &str,
    ) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            target_extension: target_extension.into(),
            category: Category::new(category),
            description: None,
            is_cross_category: false,
            is_sticker: false,
            is_animation: false,
            is_audio_extract: false,
            is_thumbnail: false,
        }
    }

    pub fn cross_category(mut self) -> Self {
        self.is_cross_category = true;
        self
    }

    pub fn sticker(mut self) -> Self {
        self.is_sticker = true;
        self
    }

    pub fn animation(mut self) -> Self {
        self.is_animation = true;
        self
    }

    pub fn audio_extract(mut self) -> Self {
        self.is_audio_extract = true;
        self
    }

    pub fn thumbnail(mut self) -> Self {
        self.is_thumbnail = true;
        self
    }

    /// Advanced settings pre-filled when a client picks this option.
    pub fn default_settings(&self) -> Map<String, Value> {
        let value = if self.is_animation {
            json!({ "startTime": 0, "duration": DEFAULT_ANIMATION_SECS.min(MAX_ANIMATION_SECS) })
        } else if self.is_sticker {
            json!({ "makeTransparent": true })
        } else {
            json!({})
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}
