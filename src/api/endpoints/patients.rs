//! Patient endpoints
//!
//! `GET /api/patients`, `POST /api/patients`, `DELETE /api/patients?id=`,
//! `GET /api/patients/:id` and `DELETE /api/patients/:id`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::address_from;
use crate::api::error::ApiError;
use crate::api::form::FormData;
use crate::api::types::{AppContext, CreatedResponse, IdQuery, MessageResponse};
use crate::core::aggregation::{document_to_json, documents_to_json};
use crate::core::records::NewPatient;
use crate::domain::PatientId;

/// `GET /api/patients` - every patient with requisitions, tests and address
pub async fn list(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    let patients = ctx.records.patients.list().await?;
    Ok(Json(documents_to_json(patients)))
}

/// `POST /api/patients` - multipart form with an optional `avatar` file
pub async fn create(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let mut form = FormData::from_multipart(multipart).await?;

    let new = NewPatient {
        name: form.require("name")?,
        address: address_from(&form)?,
        avatar: form.take_file("avatar"),
    };

    let id = ctx.records.patients.create(new).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id))))
}

/// `GET /api/patients/:id` - one patient with physicians embedded per
/// requisition
pub async fn detail(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = PatientId::parse(&id)?;
    let patient = ctx.records.patients.detail(id).await?;
    Ok(Json(document_to_json(patient)))
}

/// `DELETE /api/patients?id=`
pub async fn delete_by_query(
    State(ctx): State<AppContext>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query
        .into_id()
        .ok_or_else(|| ApiError::BadRequest("Patient ID is required".into()))?;
    delete(&ctx, &id).await
}

/// `DELETE /api/patients/:id`
pub async fn delete_by_path(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete(&ctx, &id).await
}

async fn delete(ctx: &AppContext, id: &str) -> Result<Json<MessageResponse>, ApiError> {
    let id = PatientId::parse(id)?;
    ctx.records.patients.delete(id).await?;
    Ok(Json(MessageResponse::new("Patient deleted successfully")))
}
