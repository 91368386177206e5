use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use thiserror::Error;

use crate::models::FieldViolation;

/// Outcomes a storage adapter can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("no live product with id {0}")]
    NotFound(String),

    #[error("malformed product id: {0}")]
    InvalidId(String),

    /// Connection, decode or any other backend fault.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

/// Errors returned by [`crate::ProductService`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("{reason}")]
    Validation { field: String, reason: String },

    #[error("not found product: {0}")]
    NotFound(String),

    #[error("invalid product id: {0}")]
    InvalidId(String),

    /// Storage fault or deadline overrun while running `operation`.
    #[error("{operation} failed: {reason}")]
    Internal {
        operation: &'static str,
        reason: String,
    },
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// The single place repository outcomes become service errors.
    pub fn from_repository(operation: &'static str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ProductError::NotFound(id),
            RepositoryError::InvalidId(id) => ProductError::InvalidId(id),
            RepositoryError::Storage(reason) => ProductError::Internal { operation, reason },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductError::Validation { .. } | ProductError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            ProductError::NotFound(_) => StatusCode::NOT_FOUND,
            ProductError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ProductError::Internal { .. })
    }
}

impl From<FieldViolation> for ProductError {
    fn from(violation: FieldViolation) -> Self {
        ProductError::Validation {
            field: violation.field.to_string(),
            reason: violation.reason,
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation { field, reason } => AppError::Validation {
                field,
                message: reason,
            },
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::InvalidId(_) => AppError::InvalidId(err.to_string()),
            ProductError::Internal { .. } => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
