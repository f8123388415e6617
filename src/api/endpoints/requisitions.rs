//! Requisition endpoint

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::form::FormData;
use crate::api::types::{AppContext, CreatedResponse};
use crate::core::records::requisitions::MISSING_REQUISITION_FIELDS;
use crate::core::records::NewRequisition;
use crate::domain::{PatientId, PhysicianId};

/// `POST /api/requisitions` - `patientId`, `physicianId`, `testNames[]`,
/// `samples[]`
pub async fn create(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let form = FormData::from_multipart(multipart).await?;

    let (Some(patient_id), Some(physician_id)) = (form.text("patientId"), form.text("physicianId"))
    else {
        return Err(ApiError::BadRequest(MISSING_REQUISITION_FIELDS.into()));
    };
    let test_names = form.list("testNames");
    let samples = form.list("samples");
    if test_names.is_empty() || samples.is_empty() {
        return Err(ApiError::BadRequest(MISSING_REQUISITION_FIELDS.into()));
    }

    let new = NewRequisition {
        patient_id: PatientId::parse(&patient_id)?,
        physician_id: PhysicianId::parse(&physician_id)?,
        test_names,
        samples,
    };

    let id = ctx.records.requisitions.create(new).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id))))
}
