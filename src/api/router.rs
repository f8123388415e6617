//! API router
//!
//! Routes are nested under `/api/`. Path params use `:param` syntax
//! (axum 0.7).

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, Request};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::config::ServerConfig;

/// Builds the full API router over the given context
pub fn api_router(ctx: AppContext, server: &ServerConfig) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/patients",
            get(endpoints::patients::list)
                .post(endpoints::patients::create)
                .delete(endpoints::patients::delete_by_query),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail).delete(endpoints::patients::delete_by_path),
        )
        .route(
            "/physicians",
            get(endpoints::physicians::list)
                .post(endpoints::physicians::create)
                .delete(endpoints::physicians::delete_by_query),
        )
        .route(
            "/physicians/:id",
            get(endpoints::physicians::detail)
                .put(endpoints::physicians::update)
                .delete(endpoints::physicians::delete_by_path),
        )
        .route("/requisitions", post(endpoints::requisitions::create))
        .route("/avatars/:id", get(endpoints::avatars::fetch))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors_layer(&server.cors_allowed_origins))
}

/// One span per request, tagged with a fresh request id
fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".into())
}

/// `"*"` allows any origin; otherwise only the listed origins are allowed
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
