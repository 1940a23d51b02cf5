//! The [`Transcoder`] trait is the plug point for a real conversion engine.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};

use ca_core::{Error, Result};
use ca_formats::Category;

/// What a transcoder is asked to produce.
#[derive(Debug, Clone, Default)]
pub struct TranscodeJob {
    pub source_category: Option<Category>,
    pub target_extension: String,
    /// Engine-specific settings passed through from the client.
    pub settings: Map<String, Value>,
}

/// Turns the file at `input` into the file at `output`.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Short engine name used in logs and error messages.
    fn name(&self) -> &'static str;

    async fn transcode(&self, input: &Path, output: &Path, job: &TranscodeJob) -> Result<()>;
}

/// Copies the input unchanged. Placeholder until a real engine is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranscoder;

#[async_trait]
impl Transcoder for PassthroughTranscoder {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn transcode(&self, input: &Path, output: &Path, job: &TranscodeJob) -> Result<()> {
        tracing::debug!(
            target_extension = %job.target_extension,
            settings = job.settings.len(),
            "Passthrough copy"
        );
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| Error::conversion(self.name(), format!("copy failed: {e}")))?;
        Ok(())
    }
}
