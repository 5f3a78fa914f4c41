//! Housekeeping task handlers.
//!
//! Tasks are plain records advanced by staff. Assignment is a direct field
//! set; completing a task frees its room.
use crate::api::error::{ApiError, api_domain_error, api_internal, api_not_found};
use crate::api::types::{AssignRequest, TaskCreateRequest, TaskListResponse, TaskStatusRequest};
use crate::api::{apply_room_effect, ensure_assignee, load_room, parse_body, parse_query};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_staff};
use crate::model::{HousekeepingTask, TaskFilter};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::ids::TaskId;
use lodge_core::{HousekeepingStatus, TaskKind};

async fn load_task(state: &AppState, id: TaskId) -> Result<HousekeepingTask, ApiError> {
    match state.store.get_task(id).await {
        Ok(task) => Ok(task),
        Err(StoreError::NotFound(_)) => Err(api_not_found("task not found")),
        Err(err) => Err(api_internal("failed to load task", &err)),
    }
}

async fn save_task(state: &AppState, task: HousekeepingTask) -> Result<HousekeepingTask, ApiError> {
    match state.store.update_task(task).await {
        Ok(updated) => Ok(updated),
        Err(StoreError::NotFound(_)) => Err(api_not_found("task not found")),
        Err(err) => Err(api_internal("failed to update task", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/housekeeping",
    tag = "housekeeping",
    params(TaskFilter),
    responses(
        (status = 200, description = "Housekeeping tasks", body = TaskListResponse),
        (status = 403, description = "Staff only", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<TaskFilter>, QueryRejection>,
) -> Result<Json<TaskListResponse>, ApiError> {
    require_staff(&state, &headers).await?;
    let filter = parse_query(filter)?;
    let items = state
        .store
        .list_tasks(&filter)
        .await
        .map_err(|err| api_internal("failed to list tasks", &err))?;
    Ok(Json(TaskListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/housekeeping",
    tag = "housekeeping",
    request_body = TaskCreateRequest,
    responses(
        (status = 201, description = "Task created", body = HousekeepingTask),
        (status = 404, description = "Room or assignee not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TaskCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let room = load_room(&state, body.room_id).await?;
    ensure_assignee(&state, body.assigned_to).await?;
    let now = Utc::now();
    let task = HousekeepingTask {
        id: TaskId::new(),
        room_id: room.id,
        assigned_to: body.assigned_to,
        kind: body.kind.unwrap_or(TaskKind::Cleaning),
        status: HousekeepingStatus::Pending,
        notes: body.notes,
        created_at: now,
        updated_at: now,
    };
    let created = state
        .store
        .create_task(task)
        .await
        .map_err(|err| api_internal("failed to create task", &err))?;
    tracing::info!(task_id = %created.id, room_id = %created.room_id, kind = %created.kind, "housekeeping task created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/housekeeping/{task_id}/assign",
    tag = "housekeeping",
    params(("task_id" = String, Path, description = "Task id")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignee set", body = HousekeepingTask),
        (status = 404, description = "Task or assignee not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn assign_task(
    Path(task_id): Path<TaskId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<HousekeepingTask>, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut task = load_task(&state, task_id).await?;
    ensure_assignee(&state, body.assigned_to).await?;
    task.assigned_to = body.assigned_to;
    task.updated_at = Utc::now();
    Ok(Json(save_task(&state, task).await?))
}

#[utoipa::path(
    put,
    path = "/housekeeping/{task_id}/status",
    tag = "housekeeping",
    params(("task_id" = String, Path, description = "Task id")),
    request_body = TaskStatusRequest,
    responses(
        (status = 200, description = "Status advanced; completion frees the room", body = HousekeepingTask),
        (status = 400, description = "Status cannot move backwards", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_task_status(
    Path(task_id): Path<TaskId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TaskStatusRequest>, JsonRejection>,
) -> Result<Json<HousekeepingTask>, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut task = load_task(&state, task_id).await?;
    task.status = task
        .status
        .transition(body.status)
        .map_err(|err| api_domain_error(&err))?;
    if body.notes.is_some() {
        task.notes = body.notes;
    }
    task.updated_at = Utc::now();
    let updated = save_task(&state, task).await?;
    apply_room_effect(&state, updated.room_id, updated.status.room_effect()).await?;
    tracing::info!(task_id = %updated.id, status = %updated.status, "housekeeping task updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/housekeeping/{task_id}",
    tag = "housekeeping",
    params(("task_id" = String, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_task(
    Path(task_id): Path<TaskId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    match state.store.delete_task(task_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("task not found")),
        Err(err) => Err(api_internal("failed to delete task", &err)),
    }
}
