//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, AppError>`; any [`ca_core::Error`] converts
//! with `?`. Routes whose clients match on exact error text override the
//! message (and, where needed, the status) explicitly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: ca_core::Error,
    request_id: Option<String>,
    message: Option<String>,
    status: Option<StatusCode>,
}

impl AppError {
    pub fn new(inner: ca_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
            message: None,
            status: None,
        }
    }

    /// 400 whose body `error` is exactly `message`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ca_core::Error::Validation(message.clone())).with_message(message)
    }

    /// 401 whose body `error` is exactly `message`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ca_core::Error::Unauthorized(message.clone())).with_message(message)
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Replace the `error` text of the response body.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the status derived from the inner error.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn inner(&self) -> &ca_core::Error {
        &self.inner
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or_else(|| {
            StatusCode::from_u16(self.inner.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        })
    }
}

impl From<ca_core::Error> for AppError {
    fn from(e: ca_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                request_id = ?self.request_id,
                "Server error in API handler"
            );
        }

        let body = json!({
            "error": self.message.unwrap_or_else(|| self.inner.to_string()),
            "code": self.inner.code(),
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}
