//! Front-desk HTTP API module.
//!
//! # Purpose
//! Route handler modules plus the helpers they share: body parsing with
//! validation and lookups that turn a missing record into a 404.
pub mod auth;
pub mod error;
pub mod housekeeping;
pub mod invoices;
pub mod maintenance;
pub mod openapi;
pub mod reports;
pub mod reservations;
pub mod rooms;
pub mod service_requests;
pub mod services;
pub mod settings;
pub mod system;
pub mod types;
pub mod users;

use crate::api::error::{
    ApiError, api_domain_error, api_internal, api_not_found, api_validation_error,
};
use crate::app::AppState;
use crate::model::{Booking, Room};
use crate::store::StoreError;
use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use lodge_core::bounded_money;
use lodge_core::ids::{BookingId, RoomId, UserId};
use rust_decimal::Decimal;
use validator::{Validate, ValidationErrors};

/// Unwrap a JSON body and run its `validator` rules.
///
/// # Errors
/// - 400 `validation_error` for malformed JSON, unknown enum values or any
///   failed field rule.
pub(crate) fn parse_body<T: Validate>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    value
        .validate()
        .map_err(|errors| api_validation_error(&validation_message(&errors)))?;
    Ok(value)
}

/// Unwrap query parameters, reporting a bad one as a 400 `validation_error`.
pub(crate) fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| api_validation_error(&rejection.body_text()))
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", err.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Round a catalog or room price to cents, refusing negatives and amounts
/// past the money column.
pub(crate) fn checked_price(price: Decimal) -> Result<Decimal, ApiError> {
    bounded_money(price).map_err(|err| api_domain_error(&err))
}

pub(crate) async fn load_room(state: &AppState, id: RoomId) -> Result<Room, ApiError> {
    match state.store.get_room(id).await {
        Ok(room) => Ok(room),
        Err(StoreError::NotFound(_)) => Err(api_not_found("room not found")),
        Err(err) => Err(api_internal("failed to load room", &err)),
    }
}

pub(crate) async fn load_booking(state: &AppState, id: BookingId) -> Result<Booking, ApiError> {
    match state.store.get_booking(id).await {
        Ok(booking) => Ok(booking),
        Err(StoreError::NotFound(_)) => Err(api_not_found("reservation not found")),
        Err(err) => Err(api_internal("failed to load reservation", &err)),
    }
}

/// Check that a task assignee exists and works at the hotel.
pub(crate) async fn ensure_assignee(
    state: &AppState,
    assignee: Option<UserId>,
) -> Result<(), ApiError> {
    let Some(user_id) = assignee else {
        return Ok(());
    };
    match state.store.get_user(user_id).await {
        Ok(user) if user.role.is_staff_or_admin() => Ok(()),
        Ok(_) => Err(api_validation_error("assignee must be a staff member")),
        Err(StoreError::NotFound(_)) => Err(api_not_found("assignee not found")),
        Err(err) => Err(api_internal("failed to load assignee", &err)),
    }
}

/// Apply a status side effect to a room. A room deleted in the meantime is
/// logged and skipped; the primary write has already happened.
pub(crate) async fn apply_room_effect(
    state: &AppState,
    room_id: RoomId,
    status: Option<lodge_core::RoomStatus>,
) -> Result<(), ApiError> {
    let Some(status) = status else {
        return Ok(());
    };
    match state.store.set_room_status(room_id, status).await {
        Ok(_) => Ok(()),
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(room_id = %room_id, status = %status, "room missing for status update");
            Ok(())
        }
        Err(err) => Err(api_internal("failed to update room status", &err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{LoginRequest, RegisterRequest};

    #[test]
    fn parse_body_reports_every_failed_rule() {
        let body = RegisterRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
            role: None,
            department: None,
        };
        let err = parse_body(Ok(Json(body))).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(err.body.message.contains("email is invalid"));
        assert!(err.body.message.contains("at least 6 characters"));
    }

    #[test]
    fn parse_body_passes_valid_input() {
        let body = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        let parsed = parse_body(Ok(Json(body))).expect("valid");
        assert_eq!(parsed.email, "ada@example.com");
    }
}
