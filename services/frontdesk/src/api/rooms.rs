//! Room inventory handlers.
//!
//! # Purpose
//! Public room listing and availability search, admin-only inventory CRUD,
//! and the staff status override.
use crate::api::error::{ApiError, api_conflict, api_domain_error, api_internal, api_not_found};
use crate::api::types::{
    AvailabilityQuery, RoomCreateRequest, RoomListResponse, RoomStatusRequest, RoomUpdateRequest,
};
use crate::api::{checked_price, load_room, parse_body, parse_query};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_staff};
use crate::model::{Room, RoomFilter};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::ids::RoomId;
use lodge_core::{RoomStatus, StayRange};
use std::collections::HashSet;

fn clean_amenities(amenities: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    amenities
        .into_iter()
        .map(|amenity| amenity.trim().to_string())
        .filter(|amenity| !amenity.is_empty() && seen.insert(amenity.clone()))
        .collect()
}

#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    params(RoomFilter),
    responses(
        (status = 200, description = "Rooms sorted by number", body = RoomListResponse)
    )
)]
pub(crate) async fn list_rooms(
    State(state): State<AppState>,
    filter: Result<Query<RoomFilter>, QueryRejection>,
) -> Result<Json<RoomListResponse>, ApiError> {
    let filter = parse_query(filter)?;
    let items = state
        .store
        .list_rooms(&filter)
        .await
        .map_err(|err| api_internal("failed to list rooms", &err))?;
    Ok(Json(RoomListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/rooms/availability",
    tag = "rooms",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Rooms with no live booking overlapping the stay", body = RoomListResponse),
        (status = 400, description = "check_out is not after check_in", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn available_rooms(
    State(state): State<AppState>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<RoomListResponse>, ApiError> {
    let query = parse_query(query)?;
    let stay =
        StayRange::new(query.check_in, query.check_out).map_err(|err| api_domain_error(&err))?;
    let filter = RoomFilter {
        room_type: query.room_type,
        status: None,
    };
    let rooms = state
        .store
        .list_rooms(&filter)
        .await
        .map_err(|err| api_internal("failed to list rooms", &err))?;
    let booked: HashSet<RoomId> = state
        .store
        .booked_room_ids(&stay)
        .await
        .map_err(|err| api_internal("failed to load bookings", &err))?
        .into_iter()
        .collect();
    let items = rooms
        .into_iter()
        .filter(|room| !booked.contains(&room.id))
        .collect();
    Ok(Json(RoomListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/rooms/{room_id}",
    tag = "rooms",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room", body = Room),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_room(
    Path(room_id): Path<RoomId>,
    State(state): State<AppState>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(load_room(&state, room_id).await?))
}

#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    request_body = RoomCreateRequest,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 400, description = "Invalid input", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Admin only", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Room number already exists", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RoomCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers).await?;
    let body = parse_body(body)?;
    let now = Utc::now();
    let room = Room {
        id: RoomId::new(),
        room_number: body.room_number,
        room_type: body.room_type,
        floor: body.floor,
        price: checked_price(body.price)?,
        beds: body.beds,
        status: body.status.unwrap_or(RoomStatus::Available),
        amenities: clean_amenities(body.amenities),
        description: body.description,
        created_at: now,
        updated_at: now,
    };
    match state.store.create_room(room).await {
        Ok(created) => {
            tracing::info!(room_id = %created.id, room_number = %created.room_number, "room created");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(StoreError::Conflict(_)) => Err(api_conflict(
            "already_exists",
            "room number already exists",
        )),
        Err(err) => Err(api_internal("failed to create room", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/rooms/{room_id}",
    tag = "rooms",
    params(("room_id" = String, Path, description = "Room id")),
    request_body = RoomUpdateRequest,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Room number already exists", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_room(
    Path(room_id): Path<RoomId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RoomUpdateRequest>, JsonRejection>,
) -> Result<Json<Room>, ApiError> {
    require_admin(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut room = load_room(&state, room_id).await?;
    if let Some(number) = body.room_number {
        room.room_number = number;
    }
    if let Some(room_type) = body.room_type {
        room.room_type = room_type;
    }
    if let Some(floor) = body.floor {
        room.floor = floor;
    }
    if let Some(price) = body.price {
        room.price = checked_price(price)?;
    }
    if let Some(beds) = body.beds {
        room.beds = beds;
    }
    if let Some(amenities) = body.amenities {
        room.amenities = clean_amenities(amenities);
    }
    if body.description.is_some() {
        room.description = body.description;
    }
    room.updated_at = Utc::now();
    match state.store.update_room(room).await {
        Ok(updated) => Ok(Json(updated)),
        Err(StoreError::NotFound(_)) => Err(api_not_found("room not found")),
        Err(StoreError::Conflict(_)) => Err(api_conflict(
            "already_exists",
            "room number already exists",
        )),
        Err(err) => Err(api_internal("failed to update room", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/rooms/{room_id}/status",
    tag = "rooms",
    params(("room_id" = String, Path, description = "Room id")),
    request_body = RoomStatusRequest,
    responses(
        (status = 200, description = "Room status set", body = Room),
        (status = 403, description = "Staff only", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn set_room_status(
    Path(room_id): Path<RoomId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RoomStatusRequest>, JsonRejection>,
) -> Result<Json<Room>, ApiError> {
    let principal = require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    match state.store.set_room_status(room_id, body.status).await {
        Ok(room) => {
            tracing::info!(
                room_id = %room.id,
                status = %room.status,
                by = %principal.user_id,
                "room status set"
            );
            Ok(Json(room))
        }
        Err(StoreError::NotFound(_)) => Err(api_not_found("room not found")),
        Err(err) => Err(api_internal("failed to update room status", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/rooms/{room_id}",
    tag = "rooms",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_room(
    Path(room_id): Path<RoomId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    match state.store.delete_room(room_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("room not found")),
        Err(err) => Err(api_internal("failed to delete room", &err)),
    }
}
