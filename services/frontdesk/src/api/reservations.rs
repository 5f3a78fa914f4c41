//! Reservation handlers.
//!
//! # Purpose
//! Booking creation with stay pricing, guest-scoped listing, and the
//! check-in / check-out / cancel lifecycle.
//!
//! # Key invariants
//! - Totals are `nights × nightly rate × (1 + tax rate)` rounded to cents,
//!   with the tax rate read from hotel settings at booking time.
//! - Overlapping bookings are accepted unless
//!   `AppState::reject_overlapping_bookings` is set.
//! - Lifecycle moves follow `BookingStatus::apply`; the room status follows
//!   `BookingAction::room_effect` after the booking is saved.
use crate::api::error::{
    ApiError, api_conflict, api_domain_error, api_forbidden, api_internal, api_not_found,
};
use crate::api::types::{BookingCreateRequest, BookingListResponse};
use crate::api::{apply_room_effect, load_booking, load_room, parse_body, parse_query};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_principal, require_staff};
use crate::auth::principal::Principal;
use crate::model::{Booking, BookingFilter};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::ids::{BookingId, UserId};
use lodge_core::{BookingAction, BookingStatus, Role, StayRange, stay_total};

async fn booking_guest(
    state: &AppState,
    principal: &Principal,
    requested: Option<UserId>,
) -> Result<UserId, ApiError> {
    let Some(guest_id) = requested.filter(|_| principal.is_staff_or_admin()) else {
        return Ok(principal.user_id);
    };
    match state.store.get_user(guest_id).await {
        Ok(user) if user.role == Role::Guest => Ok(user.id),
        Ok(_) => Err(api_not_found("guest not found")),
        Err(StoreError::NotFound(_)) => Err(api_not_found("guest not found")),
        Err(err) => Err(api_internal("failed to load guest", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    params(BookingFilter),
    responses(
        (status = 200, description = "Reservations, newest check-in first; guests only see their own", body = BookingListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_reservations(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<BookingFilter>, QueryRejection>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let mut filter = parse_query(filter)?;
    if let Some(own) = principal.scope() {
        filter.guest_id = Some(own);
    }
    let items = state
        .store
        .list_bookings(&filter)
        .await
        .map_err(|err| api_internal("failed to list reservations", &err))?;
    Ok(Json(BookingListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/reservations/{booking_id}",
    tag = "reservations",
    params(("booking_id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = Booking),
        (status = 403, description = "Not the guest's reservation", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_reservation(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Booking>, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let booking = load_booking(&state, booking_id).await?;
    if !principal.can_access(booking.guest_id) {
        return Err(api_forbidden("not your reservation"));
    }
    Ok(Json(booking))
}

#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = BookingCreateRequest,
    responses(
        (status = 201, description = "Reservation confirmed", body = Booking),
        (status = 400, description = "Invalid dates or guest count", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Room or guest not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Room already booked for these dates (when overlap rejection is on)", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<BookingCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let body = parse_body(body)?;
    let stay = StayRange::new(body.check_in, body.check_out).map_err(|err| api_domain_error(&err))?;
    let guest_id = booking_guest(&state, &principal, body.guest_id).await?;
    let room = load_room(&state, body.room_id).await?;
    let settings = state
        .store
        .get_settings()
        .await
        .map_err(|err| api_internal("failed to load settings", &err))?;

    let total_amount =
        stay_total(&stay, room.price, settings.tax_rate).map_err(|err| api_domain_error(&err))?;

    let now = Utc::now();
    let booking = Booking {
        id: BookingId::new(),
        guest_id,
        room_id: room.id,
        check_in: stay.check_in(),
        check_out: stay.check_out(),
        guests: body.guests,
        status: BookingStatus::Confirmed,
        total_amount,
        special_requests: body.special_requests,
        created_at: now,
        updated_at: now,
    };
    match state
        .store
        .create_booking(booking, state.reject_overlapping_bookings)
        .await
    {
        Ok(created) => {
            metrics::counter!("frontdesk_bookings_created_total").increment(1);
            tracing::info!(
                booking_id = %created.id,
                room_id = %created.room_id,
                guest_id = %created.guest_id,
                nights = stay.nights(),
                "reservation created"
            );
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(StoreError::Conflict(_)) => Err(api_conflict(
            "room_unavailable",
            "room is already booked for these dates",
        )),
        Err(err) => Err(api_internal("failed to create reservation", &err)),
    }
}

async fn transition(
    state: &AppState,
    booking: Booking,
    action: BookingAction,
) -> Result<Booking, ApiError> {
    let mut booking = booking;
    booking.status = booking
        .status
        .apply(action)
        .map_err(|err| api_domain_error(&err))?;
    booking.updated_at = Utc::now();
    let updated = match state.store.update_booking(booking).await {
        Ok(updated) => updated,
        Err(StoreError::NotFound(_)) => return Err(api_not_found("reservation not found")),
        Err(err) => return Err(api_internal("failed to update reservation", &err)),
    };
    apply_room_effect(state, updated.room_id, action.room_effect()).await?;
    metrics::counter!("frontdesk_booking_transitions_total", "action" => action.as_str())
        .increment(1);
    tracing::info!(booking_id = %updated.id, status = %updated.status, "reservation updated");
    Ok(updated)
}

#[utoipa::path(
    put,
    path = "/reservations/{booking_id}/checkin",
    tag = "reservations",
    params(("booking_id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Guest checked in; room is occupied", body = Booking),
        (status = 400, description = "Reservation is not confirmed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn check_in(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Booking>, ApiError> {
    require_staff(&state, &headers).await?;
    let booking = load_booking(&state, booking_id).await?;
    Ok(Json(transition(&state, booking, BookingAction::CheckIn).await?))
}

#[utoipa::path(
    put,
    path = "/reservations/{booking_id}/checkout",
    tag = "reservations",
    params(("booking_id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Guest checked out; room needs cleaning", body = Booking),
        (status = 400, description = "Reservation is not checked in", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn check_out(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Booking>, ApiError> {
    require_staff(&state, &headers).await?;
    let booking = load_booking(&state, booking_id).await?;
    Ok(Json(transition(&state, booking, BookingAction::CheckOut).await?))
}

#[utoipa::path(
    put,
    path = "/reservations/{booking_id}/cancel",
    tag = "reservations",
    params(("booking_id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation canceled", body = Booking),
        (status = 400, description = "Reservation is not confirmed", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Not the guest's reservation", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn cancel(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Booking>, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let booking = load_booking(&state, booking_id).await?;
    if !principal.can_access(booking.guest_id) {
        return Err(api_forbidden("not your reservation"));
    }
    Ok(Json(transition(&state, booking, BookingAction::Cancel).await?))
}

#[utoipa::path(
    delete,
    path = "/reservations/{booking_id}",
    tag = "reservations",
    params(("booking_id" = String, Path, description = "Reservation id")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Reservation not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_reservation(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    match state.store.delete_booking(booking_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("reservation not found")),
        Err(err) => Err(api_internal("failed to delete reservation", &err)),
    }
}
