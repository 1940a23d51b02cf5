//! Route handlers for the HTTP API.

pub mod catalog;
pub mod convert;
pub mod health;
pub mod options;
pub mod proxy;
pub mod uploads;

use serde::de::DeserializeOwned;

/// Parse a JSON body leniently: anything unparseable becomes `T::default()`
/// so handlers can answer with their own missing-field errors.
pub(crate) fn lenient_json<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}
