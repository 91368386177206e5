pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::Pagination;

/// Error body, shaped like [`crate::ApiResponse`] so clients parse one envelope.
///
/// ```json
/// {
///   "status_code": 404,
///   "data": null,
///   "error_message": "not found product",
///   "error_code": "NOT_FOUND",
///   "pagination": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status_code: u16,
    /// Always null on errors.
    pub data: Option<serde_json::Value>,
    pub error_message: String,
    pub error_code: ErrorCode,
    /// Extra context, e.g. the offending field of a validation error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub pagination: Option<Pagination>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data: None,
            error_message: message.into(),
            error_code: code,
            details: None,
            pagination: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Errors a handler can return; each maps to one status and [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// The message is logged, never sent to the client.
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        let body = match self {
            AppError::Validation { field, message } => {
                tracing::info!(error_code = code.code(), %field, "validation failed: {message}");
                ErrorResponse::new(status, code, message).with_details(json!({ "field": field }))
            }
            AppError::InvalidId(msg) | AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "{msg}");
                ErrorResponse::new(status, code, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "internal server error: {msg}");
                ErrorResponse::new(status, code, code.default_message())
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "service unavailable: {msg}");
                ErrorResponse::new(status, code, msg)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Builds an error envelope response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: impl Into<String>, code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(status, code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_carries_field() {
        let response = AppError::Validation {
            field: "name_product".into(),
            message: "required field name_product".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body["status_code"], 400);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
        assert_eq!(body["error_message"], "required field name_product");
        assert_eq!(body["details"]["field"], "name_product");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            AppError::InternalServerError("connection reset by peer".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["error_message"], "Internal server error");
        assert!(!body.to_string().contains("connection reset"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_not_found_and_invalid_id_statuses() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidId("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_error_response_helper() {
        let response = error_response(StatusCode::NOT_FOUND, "nothing here", ErrorCode::NotFound);
        let body: ErrorResponse =
            serde_json::from_value(body_of(response).await).unwrap();
        assert_eq!(body.status_code, 404);
        assert_eq!(body.error_code, ErrorCode::NotFound);
        assert!(body.pagination.is_none());
    }
}
