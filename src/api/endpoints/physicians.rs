//! Physician endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::address_from;
use crate::api::error::ApiError;
use crate::api::form::FormData;
use crate::api::types::{AppContext, CreatedResponse, IdQuery, MessageResponse};
use crate::core::aggregation::{document_to_json, documents_to_json};
use crate::core::records::NewPhysician;
use crate::domain::{PhysicianId, PhysicianUpdate};

/// `GET /api/physicians` - every physician with address and requisitions
pub async fn list(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    let physicians = ctx.records.physicians.list().await?;
    Ok(Json(documents_to_json(physicians)))
}

/// `POST /api/physicians`
pub async fn create(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let mut form = FormData::from_multipart(multipart).await?;

    let new = NewPhysician {
        name: form.require("name")?,
        specialization: form.require("specialization")?,
        license_number: form.require("licenseNumber")?,
        address: address_from(&form)?,
        avatar: form.take_file("avatar"),
    };

    let id = ctx.records.physicians.create(new).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id))))
}

/// `GET /api/physicians/:id`
pub async fn detail(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = PhysicianId::parse(&id)?;
    let physician = ctx.records.physicians.detail(id).await?;
    Ok(Json(document_to_json(physician)))
}

/// `PUT /api/physicians/:id` - JSON body with any of `name`,
/// `specialization` and `licenseNumber`
pub async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    body: Result<Json<PhysicianUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = PhysicianId::parse(&id)?;
    let Json(update) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    ctx.records.physicians.update(id, update).await?;
    Ok(Json(MessageResponse::new("Physician updated successfully")))
}

/// `DELETE /api/physicians?id=`
pub async fn delete_by_query(
    State(ctx): State<AppContext>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query
        .into_id()
        .ok_or_else(|| ApiError::BadRequest("Physician ID is required".into()))?;
    delete(&ctx, &id).await
}

/// `DELETE /api/physicians/:id`
pub async fn delete_by_path(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete(&ctx, &id).await
}

async fn delete(ctx: &AppContext, id: &str) -> Result<Json<MessageResponse>, ApiError> {
    let id = PhysicianId::parse(id)?;
    ctx.records.physicians.delete(id).await?;
    Ok(Json(MessageResponse::new("Physician deleted successfully")))
}
