//! Governor-based rate limiting for the authenticated API routes.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde_json::json;

use crate::context::AppContext;

/// Fallback quota when the configured one is zero.
const DEFAULT_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(300) {
    Some(n) => n,
    None => unreachable!(),
};

/// A shared rate limiter instance.
pub type SharedLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a rate limiter with the given requests-per-minute quota.
pub fn create_limiter(requests_per_minute: u32) -> SharedLimiter {
    let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(DEFAULT_PER_MINUTE));
    Arc::new(RateLimiter::direct(quota))
}

/// Returns 429 Too Many Requests once the shared quota is exhausted.
pub async fn rate_limit_middleware(
    State(ctx): State<AppContext>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    if ctx.limiter.check().is_err() {
        tracing::debug!(path = %request.uri().path(), "Rate limit exceeded");
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(json!({"error": "Rate limit exceeded", "code": "rate_limited"})),
        )
            .into_response());
    }
    Ok(next.run(request).await)
}
