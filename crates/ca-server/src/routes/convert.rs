//! Run a conversion and publish the result.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use ca_convert::{ConvertOptions, ConvertRequest, ConvertResponse};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::auth::Principal;
use crate::middleware::request_id::RequestId;
use crate::routes::lenient_json;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertBody {
    file_url: Option<String>,
    file_name: Option<String>,
    options: Option<serde_json::Value>,
}

/// POST /convert
#[utoipa::path(
    post,
    path = "/convert",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Converted file published", body = ConvertResponse),
        (status = 400, description = "Missing required data or invalid options"),
        (status = 500, description = "Failed to convert file")
    )
)]
pub async fn convert(
    State(ctx): State<AppContext>,
    Extension(principal): Extension<Principal>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ConvertResponse>, AppError> {
    let body: ConvertBody = lenient_json(&body);
    let (Some(file_url), Some(file_name), Some(options)) = (
        body.file_url.filter(|s| !s.is_empty()),
        body.file_name.filter(|s| !s.is_empty()),
        body.options.filter(|v| !v.is_null()),
    ) else {
        return Err(AppError::bad_request("Missing required data").with_request_id(request_id.0));
    };

    let options: ConvertOptions = serde_json::from_value(options).map_err(|e| {
        AppError::bad_request(format!("Invalid conversion options: {e}"))
            .with_request_id(request_id.0.clone())
    })?;

    let request = ConvertRequest {
        file_url,
        file_name,
        options,
    };

    match ctx.conversions.convert(&request, principal.owner()).await {
        Ok(response) => Ok(Json(response)),
        Err(ca_core::Error::Validation(message)) => {
            Err(AppError::bad_request(message).with_request_id(request_id.0))
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id.0,
                transient = e.is_transient(),
                "Conversion failed: {e}"
            );
            let message = format!("Failed to convert file: {e}");
            Err(AppError::new(e)
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .with_message(message)
                .with_request_id(request_id.0))
        }
    }
}
