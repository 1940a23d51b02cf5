//! ca-core: shared errors, configuration and typed identifiers.
//!
//! This crate is the foundational dependency for all other ca-* crates.

pub mod config;
pub mod error;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
