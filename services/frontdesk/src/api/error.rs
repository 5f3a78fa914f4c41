//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Keeps every error body the same shape (`code`, `message`) and maps store
//! and domain failures onto status codes.
//!
//! # Security considerations
//! - Internal errors are logged server-side and returned with a generic
//!   message.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lodge_core::DomainError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 404 error.
///
/// # What it does
/// Returns `not_found` with the given message.
///
/// # Errors
/// - Does not fail.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 error with a caller-chosen code, e.g. `already_exists`.
///
/// # Errors
/// - Does not fail.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, code, message)
}

/// Build a 500 error and log the store failure behind it.
///
/// # What it does
/// Emits a `tracing::error!` event carrying the store error and returns a
/// body that only contains `message`.
///
/// # Errors
/// - Does not fail.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "frontdesk storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Build a 400 error for malformed or invalid input.
///
/// # Errors
/// - Does not fail.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Map a domain rule violation onto a 400.
///
/// # What it does
/// Lifecycle violations get `invalid_transition`; everything else is a
/// plain `validation_error`. The message is the error's display text.
///
/// # Errors
/// - Does not fail.
pub fn api_domain_error(err: &DomainError) -> ApiError {
    let code = match err {
        DomainError::InvalidBookingTransition { .. }
        | DomainError::InvalidStatusTransition { .. } => "invalid_transition",
        _ => "validation_error",
    };
    api_error(StatusCode::BAD_REQUEST, code, &err.to_string())
}
