//! Pass-through of options and convert calls to a remote backend.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use ca_core::Error;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::proxy::FORWARDED_HEADERS;

/// POST /proxy/get-conversion-options
#[utoipa::path(
    post,
    path = "/proxy/get-conversion-options",
    request_body(content = serde_json::Value, content_type = "application/json"),
    responses(
        (status = 200, description = "Backend response, passed through"),
        (status = 500, description = "Failed to proxy request"),
        (status = 503, description = "No backend configured")
    )
)]
pub async fn proxy_conversion_options(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    forward(&ctx, "get-conversion-options", &headers, &body)
        .await
        .map_err(|e| e.with_request_id(request_id.0))
}

/// POST /proxy/convert
#[utoipa::path(
    post,
    path = "/proxy/convert",
    request_body(content = serde_json::Value, content_type = "application/json"),
    responses(
        (status = 200, description = "Backend response, passed through"),
        (status = 500, description = "Failed to proxy request"),
        (status = 503, description = "No backend configured")
    )
)]
pub async fn proxy_convert(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    forward(&ctx, "convert", &headers, &body)
        .await
        .map_err(|e| e.with_request_id(request_id.0))
}

async fn forward(
    ctx: &AppContext,
    operation: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, AppError> {
    let Some(proxy) = ctx.proxy.as_ref() else {
        return Err(AppError::new(Error::Unavailable(
            "no proxy backend configured".into(),
        )));
    };

    let payload: serde_json::Value = if body.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_slice(body)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))?
    };

    let forwarded: Vec<(&'static str, String)> = std::iter::once("authorization")
        .chain(FORWARDED_HEADERS)
        .filter_map(|name| header_str(headers, name).map(|value| (name, value)))
        .collect();

    match proxy.forward(operation, &forwarded, &payload).await {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((status, Json(reply.body)).into_response())
        }
        Err(e) => {
            let message = format!("Failed to proxy request: {e}");
            Err(AppError::new(e)
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .with_message(message))
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}
