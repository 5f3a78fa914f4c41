//! Bearer-token checks shared by every protected handler.
//!
//! Handlers call one of the `require_*` helpers first thing, passing the
//! request headers; each returns the caller or an [`ApiError`] ready to send
//! (401 for a missing or bad token, 403 for a role or account-status
//! failure).
use crate::api::error::{ApiError, api_forbidden, api_internal, api_unauthorized};
use crate::app::AppState;
use crate::auth::principal::Principal;
use crate::model::User;
use crate::store::StoreError;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use lodge_core::ids::UserId;
use std::str::FromStr;

const TOKEN_LEEWAY_SECS: u64 = 5;

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ")
}

/// Verify the bearer token and load the caller's current user record.
///
/// # Errors
/// - 401 when the header is missing, the token fails verification, or the
///   user it names no longer exists.
/// - 403 when the account is no longer approved.
pub(crate) async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let bearer = extract_bearer(headers).ok_or_else(|| api_unauthorized("missing bearer token"))?;
    let claims = state
        .tokens
        .verify(bearer, TOKEN_LEEWAY_SECS)
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected bearer token");
            api_unauthorized("invalid token")
        })?;
    let user_id = UserId::from_str(&claims.sub).map_err(|_| api_unauthorized("invalid token"))?;
    let user = match state.store.get_user(user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => return Err(api_unauthorized("invalid token")),
        Err(err) => return Err(api_internal("failed to load user", &err)),
    };
    if !user.status.can_log_in() {
        return Err(api_forbidden("account is not active"));
    }
    Ok(user)
}

pub(crate) async fn require_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let user = require_user(state, headers).await?;
    Ok(Principal::from_user(&user))
}

pub(crate) async fn require_staff(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let principal = require_principal(state, headers).await?;
    if !principal.is_staff_or_admin() {
        return Err(api_forbidden("staff access required"));
    }
    Ok(principal)
}

pub(crate) async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let principal = require_principal(state, headers).await?;
    if !principal.is_admin() {
        return Err(api_forbidden("admin access required"));
    }
    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extract_bearer_requires_scheme_prefix() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers), Some("abc.def"));
    }
}
