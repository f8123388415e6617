//! API error types with JSON responses
//!
//! Every error body has the shape `{ "error": string, "details"?: string }`.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::MedigramError;

/// Label sent for every server-side failure
pub const INTERNAL_ERROR_LABEL: &str = "Internal Server Error";

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API-level errors with HTTP status mapping
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::Internal(details) => {
                tracing::error!(details = %details, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: INTERNAL_ERROR_LABEL.to_string(),
                        details: Some(details),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<MedigramError> for ApiError {
    fn from(err: MedigramError) -> Self {
        match err {
            MedigramError::Validation(message) => ApiError::BadRequest(message),
            MedigramError::InvalidId { kind, .. } => ApiError::BadRequest(format!("Invalid {kind} ID")),
            MedigramError::NotFound(kind) => ApiError::NotFound(format!("{kind} not found")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Malformed form data: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_has_no_details() {
        let response = ApiError::BadRequest("Patient ID is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Patient ID is required");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_carries_details() {
        let response = ApiError::Internal("connection reset".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["details"], "connection reset");
    }

    #[test]
    fn test_domain_error_mapping() {
        assert!(matches!(
            ApiError::from(MedigramError::InvalidId {
                kind: "patient",
                value: "x".into()
            }),
            ApiError::BadRequest(ref m) if m == "Invalid patient ID"
        ));
        assert!(matches!(
            ApiError::from(MedigramError::NotFound("Physician")),
            ApiError::NotFound(ref m) if m == "Physician not found"
        ));
        assert!(matches!(
            ApiError::from(MedigramError::Store(StoreError::ConnectionFailed("down".into()))),
            ApiError::Internal(_)
        ));
    }
}
