//! Unified error type for the conversion service.
//!
//! Every crate funnels its failures into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status via [`Error::http_status`].
//! Classification and option resolution never produce errors; only loading,
//! storage, fetching and conversion can fail.

use std::fmt;

/// Unified error type covering all failure modes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "object", "upload").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request data or configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Fetching a source file over the network failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The object store rejected an operation.
    #[error("Storage error [{op}]: {message}")]
    Storage {
        /// The store operation that failed ("put", "list", ...).
        op: String,
        /// Human-readable error description.
        message: String,
    },

    /// The conversion engine failed.
    #[error("Conversion error [{engine}]: {message}")]
    Conversion {
        /// Name of the engine that failed.
        engine: String,
        /// Human-readable error description.
        message: String,
    },

    /// A proxied backend call failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A feature is not configured on this instance.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Unauthorized(_) => 401,
            Error::Validation(_) => 400,
            Error::Io { .. } => 500,
            Error::Fetch(_) => 502,
            Error::Storage { .. } => 500,
            Error::Conversion { .. } => 500,
            Error::Upstream(_) => 502,
            Error::Unavailable(_) => 503,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Unauthorized(_) => "unauthorized",
            Error::Validation(_) => "validation_error",
            Error::Io { .. } => "io_error",
            Error::Fetch(_) => "fetch_error",
            Error::Storage { .. } => "storage_error",
            Error::Conversion { .. } => "conversion_error",
            Error::Upstream(_) => "upstream_error",
            Error::Unavailable(_) => "unavailable",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::Fetch(_) | Error::Upstream(_))
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Storage`].
    pub fn storage(op: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Storage {
            op: op.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Conversion`].
    pub fn conversion(engine: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Conversion {
            engine: engine.into(),
            message: message.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("object", "public_uploads/a.png");
        assert_eq!(err.to_string(), "object not found: public_uploads/a.png");
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("targetExtension is required".into());
        assert_eq!(err.to_string(), "Validation error: targetExtension is required");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn unauthorized_is_401() {
        assert_eq!(Error::Unauthorized("no token".into()).http_status(), 401);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
        assert!(err.is_transient());
    }

    #[test]
    fn storage_display() {
        let err = Error::storage("put", "disk full");
        assert_eq!(err.to_string(), "Storage error [put]: disk full");
        assert!(!err.is_transient());
    }

    #[test]
    fn conversion_display() {
        let err = Error::conversion("passthrough", "copy failed");
        assert_eq!(err.to_string(), "Conversion error [passthrough]: copy failed");
        assert_eq!(err.code(), "conversion_error");
    }

    #[test]
    fn fetch_and_upstream_are_bad_gateway() {
        assert_eq!(Error::Fetch("timeout".into()).http_status(), 502);
        assert_eq!(Error::Upstream("refused".into()).http_status(), 502);
        assert!(Error::Fetch("timeout".into()).is_transient());
    }

    #[test]
    fn unavailable_is_503() {
        let err = Error::Unavailable("no proxy backend".into());
        assert_eq!(err.http_status(), 503);
    }
}
