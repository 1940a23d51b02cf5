//! Fetch, transcode and publish: one conversion end to end.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::{Map, Value};
use tempfile::TempDir;

use ca_core::{ConversionId, Error, Result};
use ca_formats::option::MAX_ANIMATION_SECS;
use ca_formats::{content_type_for, extension_of, Category, ConversionOption, FormatRegistry};
use ca_storage::{sanitize_file_name, ObjectStore, CONVERSIONS_PREFIX};

use crate::fetch::SourceFetcher;
use crate::request::{ConvertRequest, ConvertResponse};
use crate::transcoder::{TranscodeJob, Transcoder};

/// `<stem>_<first 8 hex chars of id><target_extension>`.
///
/// The stem is the final path component of `file_name` without its
/// extension.
pub fn output_file_name(file_name: &str, target_extension: &str, id: ConversionId) -> String {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let stem = base.strip_suffix(extension_of(base)).unwrap_or(base);
    format!("{stem}_{}{target_extension}", id.short())
}

/// Settings keys a client uses to pick the sticker variant of a target.
const STICKER_KEYS: [&str; 2] = ["isSticker", "is_sticker"];

pub struct ConversionService {
    fetcher: SourceFetcher,
    transcoder: Arc<dyn Transcoder>,
    store: Arc<dyn ObjectStore>,
    registry: Arc<FormatRegistry>,
}

impl ConversionService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
        registry: Arc<FormatRegistry>,
        fetch_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            fetcher: SourceFetcher::new(store.clone(), fetch_timeout)?,
            transcoder,
            store,
            registry,
        })
    }

    pub fn transcoder_name(&self) -> &'static str {
        self.transcoder.name()
    }

    /// Convert `request` on behalf of `owner`, publishing the result under
    /// `public_conversions/<owner>/`.
    pub async fn convert(&self, request: &ConvertRequest, owner: &str) -> Result<ConvertResponse> {
        request.options.validate()?;
        if request.file_url.is_empty() || request.file_name.is_empty() {
            return Err(Error::Validation("fileUrl and fileName are required".into()));
        }

        let id = ConversionId::new();
        let target_extension = request.options.target_extension.to_lowercase();
        let output_name = sanitize_file_name(&output_file_name(
            &request.file_name,
            &target_extension,
            id,
        ));

        tracing::info!(
            conversion_id = %id,
            file_name = %request.file_name,
            target = %target_extension,
            engine = self.transcoder.name(),
            "Starting conversion"
        );

        let source = self.fetcher.fetch(&request.file_url).await?;

        // Removed on drop, whichever way this function returns.
        let workdir = TempDir::new()
            .map_err(|e| Error::conversion(self.transcoder.name(), format!("temp dir: {e}")))?;
        let input = workdir.path().join(sanitize_file_name(&request.file_name));
        let output = workdir.path().join(&output_name);
        tokio::fs::write(&input, &source).await?;

        let source_category = self.source_category(request);
        let option = self.chosen_option(request, &source_category, &target_extension);
        let job = TranscodeJob {
            settings: job_settings(&request.options.settings, option.as_ref()),
            source_category: Some(source_category),
            target_extension: target_extension.clone(),
        };
        self.transcoder.transcode(&input, &output, &job).await?;

        let converted = read_output(self.transcoder.name(), &output).await?;
        let object_path = format!(
            "{CONVERSIONS_PREFIX}{}/{output_name}",
            sanitize_file_name(owner)
        );
        let stored = self
            .store
            .put(&object_path, converted, content_type_for(&output_name))
            .await?;

        tracing::info!(
            conversion_id = %id,
            path = %stored.path,
            size = stored.size,
            "Conversion complete"
        );

        Ok(ConvertResponse {
            converted_file_url: stored.url,
            converted_file_name: output_name,
        })
    }

    /// The client's category when the catalog knows it, otherwise the
    /// category classified from the file name.
    fn source_category(&self, request: &ConvertRequest) -> Category {
        match &request.options.source_category {
            Some(category) if self.registry.catalog().contains_category(category.as_str()) => {
                category.clone()
            }
            _ => self.registry.classify(&request.file_name),
        }
    }

    /// The offered option matching the requested target, if any.
    fn chosen_option(
        &self,
        request: &ConvertRequest,
        source_category: &Category,
        target_extension: &str,
    ) -> Option<ConversionOption> {
        let wants_sticker = STICKER_KEYS
            .iter()
            .any(|key| request.options.settings.get(*key).and_then(Value::as_bool) == Some(true));
        self.registry
            .resolve(source_category.as_str(), extension_of(&request.file_name))
            .into_iter()
            .filter(|o| o.target_extension.eq_ignore_ascii_case(target_extension))
            .find(|o| o.is_sticker == wants_sticker)
    }
}

/// Client settings with the option's defaults filled in for missing keys.
/// A numeric `duration` is capped at [`MAX_ANIMATION_SECS`].
pub fn job_settings(
    client: &Map<String, Value>,
    option: Option<&ConversionOption>,
) -> Map<String, Value> {
    let mut settings = client.clone();
    if let Some(option) = option {
        for (key, value) in option.default_settings() {
            settings.entry(key).or_insert(value);
        }
    }
    if let Some(duration) = settings.get("duration").and_then(Value::as_f64) {
        if duration > MAX_ANIMATION_SECS {
            tracing::debug!(requested = duration, "Capping animation duration");
            settings.insert("duration".into(), Value::from(MAX_ANIMATION_SECS));
        }
    }
    settings
}

async fn read_output(engine: &str, output: &Path) -> Result<Bytes> {
    tokio::fs::read(output)
        .await
        .map(Bytes::from)
        .map_err(|e| Error::conversion(engine, format!("no output produced: {e}")))
}
