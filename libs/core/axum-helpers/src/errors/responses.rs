//! Reusable OpenAPI responses for the error envelope.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "status_code": 500,
        "data": null,
        "error_message": "Internal server error",
        "error_code": "INTERNAL_ERROR",
        "pagination": null
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "status_code": 400,
        "data": null,
        "error_message": "required field name_product",
        "error_code": "VALIDATION_ERROR",
        "details": { "field": "name_product" },
        "pagination": null
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid Id",
    content_type = "application/json",
    example = json!({
        "status_code": 400,
        "data": null,
        "error_message": "invalid id",
        "error_code": "INVALID_ID",
        "pagination": null
    })
)]
pub struct BadRequestInvalidIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "status_code": 404,
        "data": null,
        "error_message": "not found product",
        "error_code": "NOT_FOUND",
        "pagination": null
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "status_code": 503,
        "data": null,
        "error_message": "database unreachable",
        "error_code": "SERVICE_UNAVAILABLE",
        "pagination": null
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
