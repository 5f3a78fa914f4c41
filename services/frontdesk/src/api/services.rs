//! Service catalog handlers: list for any signed-in user, edit for admins.
use crate::api::error::{ApiError, api_internal, api_not_found};
use crate::api::types::{ServiceCreateRequest, ServiceListResponse, ServiceUpdateRequest};
use crate::api::{checked_price, parse_body};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_principal};
use crate::model::Service;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use lodge_core::ids::ServiceId;

#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses(
        (status = 200, description = "Catalog sorted by category and name", body = ServiceListResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_services(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ServiceListResponse>, ApiError> {
    require_principal(&state, &headers).await?;
    let items = state
        .store
        .list_services()
        .await
        .map_err(|err| api_internal("failed to list services", &err))?;
    Ok(Json(ServiceListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = ServiceCreateRequest,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Invalid input", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_service(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ServiceCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers).await?;
    let body = parse_body(body)?;
    let service = Service {
        id: ServiceId::new(),
        name: body.name,
        description: body.description,
        category: body.category.to_ascii_lowercase(),
        price: checked_price(body.price)?,
        available: body.available.unwrap_or(true),
    };
    let created = state
        .store
        .create_service(service)
        .await
        .map_err(|err| api_internal("failed to create service", &err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/services/{service_id}",
    tag = "services",
    params(("service_id" = String, Path, description = "Service id")),
    request_body = ServiceUpdateRequest,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_service(
    Path(service_id): Path<ServiceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ServiceUpdateRequest>, JsonRejection>,
) -> Result<Json<Service>, ApiError> {
    require_admin(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut service = match state.store.get_service(service_id).await {
        Ok(service) => service,
        Err(StoreError::NotFound(_)) => return Err(api_not_found("service not found")),
        Err(err) => return Err(api_internal("failed to load service", &err)),
    };
    if let Some(name) = body.name {
        service.name = name;
    }
    if body.description.is_some() {
        service.description = body.description;
    }
    if let Some(category) = body.category {
        service.category = category.to_ascii_lowercase();
    }
    if let Some(price) = body.price {
        service.price = checked_price(price)?;
    }
    if let Some(available) = body.available {
        service.available = available;
    }
    match state.store.update_service(service).await {
        Ok(updated) => Ok(Json(updated)),
        Err(StoreError::NotFound(_)) => Err(api_not_found("service not found")),
        Err(err) => Err(api_internal("failed to update service", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/services/{service_id}",
    tag = "services",
    params(("service_id" = String, Path, description = "Service id")),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 404, description = "Service not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_service(
    Path(service_id): Path<ServiceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    match state.store.delete_service(service_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("service not found")),
        Err(err) => Err(api_internal("failed to delete service", &err)),
    }
}
