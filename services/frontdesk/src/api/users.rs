//! User administration and the signed-in user's own profile.
//!
//! # Key invariants
//! - Responses carry [`UserProfile`], never the stored password hash.
//! - A staff account always has a department; other roles never do.
//! - Photos land in the upload directory as `<user id>-<random>.<ext>` and
//!   are served from `/uploads`.
use crate::api::error::{
    ApiError, api_domain_error, api_internal, api_internal_message, api_not_found,
    api_validation_error,
};
use crate::api::parse_body;
use crate::api::parse_query;
use crate::api::types::{
    PasswordChangeRequest, ProfileUpdateRequest, UserAdminUpdateRequest, UserListResponse,
};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_user};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::model::{User, UserFilter, UserProfile};
use crate::store::StoreError;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use lodge_core::ids::UserId;
use uuid::Uuid;

const PHOTO_FIELD: &str = "photo";
const UPLOADS_ROUTE: &str = "/uploads";

async fn load_user(state: &AppState, id: UserId) -> Result<User, ApiError> {
    match state.store.get_user(id).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to load user", &err)),
    }
}

async fn save_user(state: &AppState, user: User) -> Result<User, ApiError> {
    match state.store.update_user(user).await {
        Ok(updated) => Ok(updated),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to update user", &err)),
    }
}

/// File extension for an uploaded photo. Only raster formats are stored;
/// anything else, SVG included, is refused.
fn photo_extension(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match mime.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/pjpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Admin only", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<UserFilter>, QueryRejection>,
) -> Result<Json<UserListResponse>, ApiError> {
    require_admin(&state, &headers).await?;
    let filter = parse_query(filter)?;
    let users = state
        .store
        .list_users(&filter)
        .await
        .map_err(|err| api_internal("failed to list users", &err))?;
    Ok(Json(UserListResponse {
        items: users.iter().map(UserProfile::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserProfile),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    require_admin(&state, &headers).await?;
    let user = load_user(&state, user_id).await?;
    Ok(Json(UserProfile::from(&user)))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = UserAdminUpdateRequest,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 400, description = "Staff without a department", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<UserAdminUpdateRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let admin = require_admin(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut user = load_user(&state, user_id).await?;
    let role = body.role.unwrap_or(user.role);
    user.department = role
        .department_for(body.department.or(user.department))
        .map_err(|err| api_domain_error(&err))?;
    user.role = role;
    if let Some(status) = body.status {
        user.status = status;
    }
    user.updated_at = Utc::now();
    let updated = save_user(&state, user).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        user_id = %updated.id,
        role = %updated.role,
        status = %updated.status,
        "user updated by admin"
    );
    Ok(Json(UserProfile::from(&updated)))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Admins cannot delete themselves", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let admin = require_admin(&state, &headers).await?;
    if admin.user_id == user_id {
        return Err(api_validation_error("admins cannot delete their own account"));
    }
    match state.store.delete_user(user_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to delete user", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Signed-in user", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(UserProfile::from(&user)))
}

#[utoipa::path(
    put,
    path = "/users/me",
    tag = "users",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Invalid input", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ProfileUpdateRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut user = require_user(&state, &headers).await?;
    let body = parse_body(body)?;
    if let Some(name) = body.name {
        user.name = name;
    }
    if let Some(contact) = body.contact {
        user.contact = contact;
    }
    if let Some(preferences) = body.preferences {
        user.preferences = preferences;
    }
    user.updated_at = Utc::now();
    let updated = save_user(&state, user).await?;
    Ok(Json(UserProfile::from(&updated)))
}

#[utoipa::path(
    put,
    path = "/users/me/password",
    tag = "users",
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Current password is wrong or new one too short", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PasswordChangeRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let mut user = require_user(&state, &headers).await?;
    let body = parse_body(body)?;
    let verified = verify_password_blocking(body.current_password, user.password_hash.clone())
        .await
        .map_err(|err| {
            tracing::error!(user_id = %user.id, error = %err, "password verification failed");
            api_internal_message("failed to verify password")
        })?;
    if !verified {
        return Err(api_validation_error("current password is incorrect"));
    }
    user.password_hash = hash_password_blocking(body.new_password)
        .await
        .map_err(|err| {
            tracing::error!(user_id = %user.id, error = %err, "password hashing failed");
            api_internal_message("failed to change password")
        })?;
    user.updated_at = Utc::now();
    let updated = save_user(&state, user).await?;
    tracing::info!(user_id = %updated.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/users/me/photo",
    tag = "users",
    request_body(content = String, description = "Multipart form with an image in the `photo` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo stored; `photo_url` updated", body = UserProfile),
        (status = 400, description = "Missing field, not an image, or too large", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn upload_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut user = require_user(&state, &headers).await?;
    let mut multipart =
        multipart.map_err(|rejection| api_validation_error(&rejection.body_text()))?;

    let mut photo = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| api_validation_error(&err.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let ext = field
            .content_type()
            .and_then(photo_extension)
            .ok_or_else(|| api_validation_error("photo must be a PNG, JPEG, GIF or WebP image"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| api_validation_error(&err.body_text()))?;
        photo = Some((ext, bytes));
        break;
    }
    let Some((ext, bytes)) = photo else {
        return Err(api_validation_error("multipart field `photo` is required"));
    };
    if bytes.is_empty() {
        return Err(api_validation_error("photo is empty"));
    }
    if bytes.len() > state.uploads.max_bytes {
        return Err(api_validation_error(&format!(
            "photo exceeds {} bytes",
            state.uploads.max_bytes
        )));
    }

    let file_name = format!("{}-{}.{ext}", user.id, Uuid::new_v4().simple());
    let path = state.uploads.dir.join(&file_name);
    tokio::fs::create_dir_all(&state.uploads.dir)
        .await
        .map_err(|err| {
            tracing::error!(dir = %state.uploads.dir.display(), error = %err, "upload dir unavailable");
            api_internal_message("failed to store photo")
        })?;
    tokio::fs::write(&path, &bytes).await.map_err(|err| {
        tracing::error!(path = %path.display(), error = %err, "failed to write photo");
        api_internal_message("failed to store photo")
    })?;

    let previous = user.photo_url.replace(format!("{UPLOADS_ROUTE}/{file_name}"));
    user.updated_at = Utc::now();
    let updated = save_user(&state, user).await?;
    if let Some(old_name) = previous
        .as_deref()
        .and_then(|url| url.strip_prefix(UPLOADS_ROUTE))
        .map(|rest| rest.trim_start_matches('/'))
        .filter(|name| !name.is_empty() && !name.contains('/'))
        && let Err(err) = tokio::fs::remove_file(state.uploads.dir.join(old_name)).await
    {
        tracing::warn!(file = old_name, error = %err, "failed to remove previous photo");
    }
    tracing::info!(user_id = %updated.id, file = %file_name, bytes = bytes.len(), "profile photo stored");
    Ok(Json(UserProfile::from(&updated)))
}
