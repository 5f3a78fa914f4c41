//! Maintenance request handlers.
//!
//! Anyone signed in can report an issue; staff assign and advance it.
//! Starting work takes the room out of service and resolving puts it back.
use crate::api::error::{ApiError, api_domain_error, api_internal, api_not_found};
use crate::api::types::{
    AssignRequest, MaintenanceCreateRequest, MaintenanceListResponse, MaintenanceStatusRequest,
};
use crate::api::{apply_room_effect, ensure_assignee, load_room, parse_body, parse_query};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_principal, require_staff};
use crate::model::{MaintenanceFilter, MaintenanceRequest};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::ids::MaintenanceId;
use lodge_core::{MaintenancePriority, MaintenanceStatus};

async fn load_request(state: &AppState, id: MaintenanceId) -> Result<MaintenanceRequest, ApiError> {
    match state.store.get_maintenance(id).await {
        Ok(request) => Ok(request),
        Err(StoreError::NotFound(_)) => Err(api_not_found("maintenance request not found")),
        Err(err) => Err(api_internal("failed to load maintenance request", &err)),
    }
}

async fn save_request(
    state: &AppState,
    request: MaintenanceRequest,
) -> Result<MaintenanceRequest, ApiError> {
    match state.store.update_maintenance(request).await {
        Ok(updated) => Ok(updated),
        Err(StoreError::NotFound(_)) => Err(api_not_found("maintenance request not found")),
        Err(err) => Err(api_internal("failed to update maintenance request", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    params(MaintenanceFilter),
    responses(
        (status = 200, description = "Maintenance requests", body = MaintenanceListResponse),
        (status = 403, description = "Staff only", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<MaintenanceFilter>, QueryRejection>,
) -> Result<Json<MaintenanceListResponse>, ApiError> {
    require_staff(&state, &headers).await?;
    let filter = parse_query(filter)?;
    let items = state
        .store
        .list_maintenance(&filter)
        .await
        .map_err(|err| api_internal("failed to list maintenance requests", &err))?;
    Ok(Json(MaintenanceListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    request_body = MaintenanceCreateRequest,
    responses(
        (status = 201, description = "Issue reported", body = MaintenanceRequest),
        (status = 400, description = "Invalid input", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn report_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MaintenanceCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let body = parse_body(body)?;
    let room = load_room(&state, body.room_id).await?;
    let now = Utc::now();
    let request = MaintenanceRequest {
        id: MaintenanceId::new(),
        room_id: room.id,
        reported_by: principal.user_id,
        assigned_to: None,
        issue: body.issue,
        priority: body.priority.unwrap_or(MaintenancePriority::Medium),
        status: MaintenanceStatus::Open,
        created_at: now,
        updated_at: now,
    };
    let created = state
        .store
        .create_maintenance(request)
        .await
        .map_err(|err| api_internal("failed to report issue", &err))?;
    tracing::info!(
        request_id = %created.id,
        room_id = %created.room_id,
        priority = %created.priority,
        "maintenance issue reported"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/maintenance/{request_id}/assign",
    tag = "maintenance",
    params(("request_id" = String, Path, description = "Maintenance request id")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignee set", body = MaintenanceRequest),
        (status = 404, description = "Request or assignee not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn assign_request(
    Path(request_id): Path<MaintenanceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<MaintenanceRequest>, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut request = load_request(&state, request_id).await?;
    ensure_assignee(&state, body.assigned_to).await?;
    request.assigned_to = body.assigned_to;
    request.updated_at = Utc::now();
    Ok(Json(save_request(&state, request).await?))
}

#[utoipa::path(
    put,
    path = "/maintenance/{request_id}/status",
    tag = "maintenance",
    params(("request_id" = String, Path, description = "Maintenance request id")),
    request_body = MaintenanceStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = MaintenanceRequest),
        (status = 400, description = "Status cannot move backwards", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_request_status(
    Path(request_id): Path<MaintenanceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MaintenanceStatusRequest>, JsonRejection>,
) -> Result<Json<MaintenanceRequest>, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut request = load_request(&state, request_id).await?;
    request.status = request
        .status
        .transition(body.status)
        .map_err(|err| api_domain_error(&err))?;
    request.updated_at = Utc::now();
    let updated = save_request(&state, request).await?;
    apply_room_effect(&state, updated.room_id, updated.status.room_effect()).await?;
    tracing::info!(request_id = %updated.id, status = %updated.status, "maintenance request updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/maintenance/{request_id}",
    tag = "maintenance",
    params(("request_id" = String, Path, description = "Maintenance request id")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_request(
    Path(request_id): Path<MaintenanceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    match state.store.delete_maintenance(request_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("maintenance request not found")),
        Err(err) => Err(api_internal("failed to delete maintenance request", &err)),
    }
}
