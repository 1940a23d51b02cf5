//! Read-only view of the loaded format catalog.

use axum::extract::State;
use axum::Json;

use ca_formats::FormatCatalog;

use crate::context::AppContext;

/// GET /catalog
#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Formats grouped by category, in catalog order")
    )
)]
pub async fn get_catalog(State(ctx): State<AppContext>) -> Json<FormatCatalog> {
    Json(ctx.registry.catalog().clone())
}
