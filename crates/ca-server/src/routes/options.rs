//! Conversion options for an uploaded file.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use ca_formats::ConversionOptions;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::lenient_json;

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRequest {
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

/// POST /get-conversion-options
#[utoipa::path(
    post,
    path = "/get-conversion-options",
    request_body = OptionsRequest,
    responses(
        (status = 200, description = "Source category and available targets", body = ConversionOptions),
        (status = 400, description = "Missing fileUrl or fileName"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn get_conversion_options(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<Json<ConversionOptions>, AppError> {
    let req: OptionsRequest = lenient_json(&body);
    let (Some(_file_url), Some(file_name)) = (
        req.file_url.filter(|s| !s.is_empty()),
        req.file_name.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request("Missing fileUrl or fileName"));
    };

    Ok(Json(ctx.registry.options_for(&file_name)))
}
