//! Service requests raised against a reservation.
//!
//! Guests request catalog services for their own live reservations and only
//! ever see their own requests. Staff see everything and advance the status.
use crate::api::error::{
    ApiError, api_domain_error, api_forbidden, api_internal, api_not_found, api_validation_error,
};
use crate::api::types::{
    ServiceRequestCreateRequest, ServiceRequestListResponse, ServiceRequestStatusRequest,
};
use crate::api::{load_booking, parse_body, parse_query};
use crate::app::AppState;
use crate::auth::guard::{require_principal, require_staff};
use crate::model::{ServiceRequest, ServiceRequestFilter};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::ServiceRequestStatus;
use lodge_core::ids::ServiceRequestId;

#[utoipa::path(
    get,
    path = "/service-requests",
    tag = "service-requests",
    params(ServiceRequestFilter),
    responses(
        (status = 200, description = "Service requests; guests only see their own", body = ServiceRequestListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_service_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<ServiceRequestFilter>, QueryRejection>,
) -> Result<Json<ServiceRequestListResponse>, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let mut filter = parse_query(filter)?;
    if let Some(own) = principal.scope() {
        filter.guest_id = Some(own);
    }
    let items = state
        .store
        .list_service_requests(&filter)
        .await
        .map_err(|err| api_internal("failed to list service requests", &err))?;
    Ok(Json(ServiceRequestListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/service-requests",
    tag = "service-requests",
    request_body = ServiceRequestCreateRequest,
    responses(
        (status = 201, description = "Request raised", body = ServiceRequest),
        (status = 400, description = "Reservation closed or service unavailable", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Not the guest's reservation", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation or service not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_service_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ServiceRequestCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let body = parse_body(body)?;
    let booking = load_booking(&state, body.booking_id).await?;
    if !principal.can_access(booking.guest_id) {
        return Err(api_forbidden("not your reservation"));
    }
    if !booking.status.holds_inventory() {
        return Err(api_validation_error(&format!(
            "reservation is {}; services can only be requested during a live stay",
            booking.status
        )));
    }
    let service = match state.store.get_service(body.service_id).await {
        Ok(service) => service,
        Err(StoreError::NotFound(_)) => return Err(api_not_found("service not found")),
        Err(err) => return Err(api_internal("failed to load service", &err)),
    };
    if !service.available {
        return Err(api_validation_error("service is not available"));
    }
    let now = Utc::now();
    let request = ServiceRequest {
        id: ServiceRequestId::new(),
        guest_id: booking.guest_id,
        service_id: service.id,
        booking_id: booking.id,
        status: ServiceRequestStatus::Pending,
        notes: body.notes,
        created_at: now,
        updated_at: now,
    };
    let created = state
        .store
        .create_service_request(request)
        .await
        .map_err(|err| api_internal("failed to create service request", &err))?;
    tracing::info!(
        request_id = %created.id,
        service_id = %created.service_id,
        booking_id = %created.booking_id,
        "service requested"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/service-requests/{request_id}/status",
    tag = "service-requests",
    params(("request_id" = String, Path, description = "Service request id")),
    request_body = ServiceRequestStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = ServiceRequest),
        (status = 400, description = "Transition not allowed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_service_request_status(
    Path(request_id): Path<ServiceRequestId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ServiceRequestStatusRequest>, JsonRejection>,
) -> Result<Json<ServiceRequest>, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut request = match state.store.get_service_request(request_id).await {
        Ok(request) => request,
        Err(StoreError::NotFound(_)) => return Err(api_not_found("service request not found")),
        Err(err) => return Err(api_internal("failed to load service request", &err)),
    };
    request.status = request
        .status
        .transition(body.status)
        .map_err(|err| api_domain_error(&err))?;
    request.updated_at = Utc::now();
    match state.store.update_service_request(request).await {
        Ok(updated) => {
            tracing::info!(request_id = %updated.id, status = %updated.status, "service request updated");
            Ok(Json(updated))
        }
        Err(StoreError::NotFound(_)) => Err(api_not_found("service request not found")),
        Err(err) => Err(api_internal("failed to update service request", &err)),
    }
}
