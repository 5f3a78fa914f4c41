//! Registration and login.
//!
//! # Key invariants
//! - Emails are compared and stored lower-cased.
//! - Guests are approved on registration; staff wait for an admin. Nobody
//!   can register as an admin.
//! - Login failures for unknown emails and wrong passwords look the same.
use crate::api::error::{
    ApiError, api_conflict, api_domain_error, api_forbidden, api_internal, api_internal_message,
    api_unauthorized,
};
use crate::api::parse_body;
use crate::api::types::{AuthResponse, LoginRequest, RegisterRequest};
use crate::app::AppState;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::model::{ContactInfo, Preferences, User, UserProfile};
use crate::store::StoreError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::Role;
use lodge_core::ids::UserId;

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let token = state.tokens.mint(user, state.token_ttl).map_err(|err| {
        tracing::error!(error = %err, "failed to mint session token");
        api_internal_message("failed to issue token")
    })?;
    Ok(AuthResponse {
        token,
        user: UserProfile::from(user),
        dashboard: user.dashboard(),
    })
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Role cannot self-register", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = parse_body(body)?;
    let role = body.role.unwrap_or(Role::Guest);
    let status = role
        .registration_status()
        .map_err(|err| api_forbidden(&err.to_string()))?;
    let department = role
        .department_for(body.department)
        .map_err(|err| api_domain_error(&err))?;
    let email = normalize_email(&body.email);

    match state.store.find_user_by_email(&email).await {
        Ok(Some(_)) => return Err(api_conflict("already_exists", "email already registered")),
        Ok(None) => {}
        Err(err) => return Err(api_internal("failed to look up user", &err)),
    }

    let password_hash = hash_password_blocking(body.password).await.map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        api_internal_message("failed to register user")
    })?;
    let now = Utc::now();
    let user = User {
        id: UserId::new(),
        name: body.name,
        email,
        password_hash,
        role,
        department,
        status,
        preferences: Preferences::default(),
        contact: ContactInfo::default(),
        photo_url: None,
        created_at: now,
        updated_at: now,
    };
    let created = match state.store.create_user(user).await {
        Ok(created) => created,
        Err(StoreError::Conflict(_)) => {
            return Err(api_conflict("already_exists", "email already registered"));
        }
        Err(err) => return Err(api_internal("failed to register user", &err)),
    };
    metrics::counter!("frontdesk_registrations_total", "role" => role.as_str()).increment(1);
    tracing::info!(user_id = %created.id, role = %role, status = %created.status, "user registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, &created)?)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Account not approved", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let body = parse_body(body)?;
    let email = normalize_email(&body.email);
    let user = match state.store.find_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            metrics::counter!("frontdesk_logins_total", "outcome" => "rejected").increment(1);
            return Err(api_unauthorized("invalid credentials"));
        }
        Err(err) => return Err(api_internal("failed to look up user", &err)),
    };
    let verified = verify_password_blocking(body.password, user.password_hash.clone())
        .await
        .map_err(|err| {
            tracing::error!(user_id = %user.id, error = %err, "password verification failed");
            api_internal_message("failed to verify credentials")
        })?;
    if !verified {
        metrics::counter!("frontdesk_logins_total", "outcome" => "rejected").increment(1);
        return Err(api_unauthorized("invalid credentials"));
    }
    if !user.status.can_log_in() {
        metrics::counter!("frontdesk_logins_total", "outcome" => "blocked").increment(1);
        return Err(api_forbidden(&format!("account is {}", user.status)));
    }
    metrics::counter!("frontdesk_logins_total", "outcome" => "ok").increment(1);
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(auth_response(&state, &user)?))
}
