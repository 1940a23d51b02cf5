//! ca-convert: runs a single conversion.
//!
//! A [`ConversionService`] fetches the source named by a request, hands it to
//! a pluggable [`Transcoder`] inside a temporary directory, and publishes the
//! result to the object store. The default [`PassthroughTranscoder`] copies
//! bytes unchanged.

pub mod fetch;
pub mod request;
pub mod service;
pub mod transcoder;

pub use fetch::{decode_data_url, SourceFetcher};
pub use request::{ConvertOptions, ConvertRequest, ConvertResponse};
pub use service::{output_file_name, ConversionService};
pub use transcoder::{PassthroughTranscoder, TranscodeJob, Transcoder};
