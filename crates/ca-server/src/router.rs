//! Axum router construction.
//!
//! Every API route is reachable both at the root and under `/api`. Stored
//! objects are served read-only from `/files`, and the OpenAPI document is
//! browsable at `/api-docs`.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::auth::auth_middleware;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::middleware::request_id::{request_id_middleware, X_REQUEST_ID};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::options::get_conversion_options,
        routes::convert::convert,
        routes::uploads::upload,
        routes::proxy::proxy_conversion_options,
        routes::proxy::proxy_convert,
        routes::catalog::get_catalog,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::options::OptionsRequest,
        routes::uploads::UploadResponse,
        ca_formats::ConversionOptions,
        ca_formats::ConversionOption,
        ca_formats::Category,
        ca_convert::ConvertRequest,
        ca_convert::ConvertOptions,
        ca_convert::ConvertResponse,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let config = ctx.config.clone();

    let api = Router::new()
        .route(
            "/get-conversion-options",
            post(routes::options::get_conversion_options),
        )
        .route("/convert", post(routes::convert::convert))
        .route("/uploads", post(routes::uploads::upload))
        .route(
            "/proxy/get-conversion-options",
            post(routes::proxy::proxy_conversion_options),
        )
        .route("/proxy/convert", post(routes::proxy::proxy_convert))
        .route("/catalog", get(routes::catalog::get_catalog))
        // Route layers only, so unknown paths stay 404. Auth runs first and
        // rejected requests never reach the limiter.
        .route_layer(middleware::from_fn_with_state(
            ctx.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), auth_middleware))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/health", get(routes::health::health_check))
        .merge(api.clone())
        .nest("/api", api)
        .nest_service("/files", ServeDir::new(&config.storage.root))
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&config.server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Any origin without credentials when no origins are configured; otherwise
/// the listed origins with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(methods)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::CACHE_CONTROL,
            header::PRAGMA,
            header::EXPIRES,
            HeaderName::from_static("x-requested-with"),
            X_REQUEST_ID.clone(),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
