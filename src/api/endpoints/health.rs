//! Health check endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::AppContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: String,
    pub version: &'static str,
    pub timestamp: String,
}

/// `GET /api/health` - pings the document store
pub async fn check(State(ctx): State<AppContext>) -> Result<Json<HealthResponse>, ApiError> {
    ctx.records.check_health().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: ctx.records.database_name().to_string(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
