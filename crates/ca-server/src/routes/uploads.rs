//! Raw file uploads into the public uploads area.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ca_core::UploadId;
use ca_formats::content_type_for;
use ca_storage::{sanitize_file_name, UPLOADS_PREFIX};

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UploadParams {
    /// Original file name, used for the stored name and content type.
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[schema(value_type = String)]
    pub id: UploadId,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub path: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// POST /uploads?name=<file name>
#[utoipa::path(
    post,
    path = "/uploads",
    params(UploadParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file name or empty body"),
        (status = 413, description = "Upload too large")
    )
)]
pub async fn upload(
    State(ctx): State<AppContext>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let Some(name) = params.name.filter(|n| !n.trim().is_empty()) else {
        return Err(AppError::bad_request("Missing file name"));
    };
    if body.is_empty() {
        return Err(AppError::bad_request("Missing file data"));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "application/octet-stream")
        .map(String::from)
        .unwrap_or_else(|| content_type_for(&name).to_string());

    let created_at = Utc::now();
    let path = format!(
        "{UPLOADS_PREFIX}{}_{}",
        created_at.timestamp_millis(),
        sanitize_file_name(&name)
    );
    let stored = ctx.store.put(&path, body, &content_type).await?;

    tracing::info!(path = %stored.path, size = stored.size, "Upload stored");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: UploadId::new(),
            name,
            size: stored.size,
            content_type,
            path: stored.path,
            url: stored.url,
            created_at,
            status: "uploaded".into(),
        }),
    ))
}
