//! Bearer-token authentication middleware.
//!
//! Every API route except `/health` requires `Authorization: Bearer <token>`.
//! Tokens starting with `anonymous-` identify anonymous browser sessions and
//! are accepted as-is; anything else must be one of the configured API keys.
//! The resolved [`Principal`] is inserted into request extensions.

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use ca_core::config::AuthConfig;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// Prefix of self-issued anonymous session tokens.
pub const ANONYMOUS_PREFIX: &str = "anonymous-";

/// Owner used for every request when auth is disabled.
const ANONYMOUS_OWNER: &str = "anonymous";

pub const MISSING_HEADER: &str = "Authorization header missing or invalid";
pub const INVALID_TOKEN: &str = "Invalid authorization token";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable owner id; scopes the caller's conversion outputs.
    pub id: String,
    pub anonymous: bool,
}

impl Principal {
    pub fn owner(&self) -> &str {
        &self.id
    }
}

/// Resolve the `Authorization` header value to a principal, or the error
/// message to send back.
pub fn authenticate(
    auth: &AuthConfig,
    authorization: Option<&str>,
) -> Result<Principal, &'static str> {
    if !auth.enabled {
        return Ok(Principal {
            id: ANONYMOUS_OWNER.into(),
            anonymous: true,
        });
    }

    let token = authorization
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(MISSING_HEADER)?;

    if auth.allow_anonymous && token.starts_with(ANONYMOUS_PREFIX) {
        return Ok(Principal {
            id: token.to_string(),
            anonymous: true,
        });
    }

    // Owner ids appear in public URLs; never the key itself.
    match auth.api_keys.iter().position(|key| key == token) {
        Some(idx) => Ok(Principal {
            id: format!("key-{idx}"),
            anonymous: false,
        }),
        None => Err(INVALID_TOKEN),
    }
}

/// Authentication middleware. Applied to protected routes only.
pub async fn auth_middleware(
    State(ctx): State<AppContext>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let authorization = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match authenticate(&ctx.config.auth, authorization) {
        Ok(principal) => {
            tracing::trace!(owner = %principal.id, anonymous = principal.anonymous, "Authenticated");
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(message) => {
            let mut err = AppError::unauthorized(message);
            if let Some(id) = request.extensions().get::<RequestId>() {
                err = err.with_request_id(id.0.clone());
            }
            Err(err.into_response())
        }
    }
}
