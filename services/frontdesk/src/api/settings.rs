//! Hotel settings: readable by anyone signed in, editable by admins.
use crate::api::error::{ApiError, api_domain_error, api_internal, api_validation_error};
use crate::api::parse_body;
use crate::api::types::SettingsUpdateRequest;
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_principal};
use crate::model::HotelSettings;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use chrono::{NaiveTime, Utc};
use lodge_core::validate_tax_rate;

/// Normalizes an `HH:MM` time of day.
fn clock_time(field: &str, value: &str) -> Result<String, ApiError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| api_validation_error(&format!("{field} must be HH:MM")))
}

fn currency_code(value: &str) -> Result<String, ApiError> {
    let code = value.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(api_validation_error("currency must be a 3-letter code"));
    }
    Ok(code)
}

fn apply_update(
    mut settings: HotelSettings,
    body: SettingsUpdateRequest,
) -> Result<HotelSettings, ApiError> {
    if let Some(name) = body.hotel_name {
        settings.hotel_name = name;
    }
    if let Some(currency) = body.currency {
        settings.currency = currency_code(&currency)?;
    }
    if let Some(rate) = body.tax_rate {
        settings.tax_rate = validate_tax_rate(rate).map_err(|err| api_domain_error(&err))?;
    }
    if let Some(time) = body.check_in_time {
        settings.check_in_time = clock_time("check_in_time", &time)?;
    }
    if let Some(time) = body.check_out_time {
        settings.check_out_time = clock_time("check_out_time", &time)?;
    }
    settings.updated_at = Some(Utc::now());
    Ok(settings)
}

#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Current hotel settings", body = HotelSettings),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HotelSettings>, ApiError> {
    require_principal(&state, &headers).await?;
    let settings = state
        .store
        .get_settings()
        .await
        .map_err(|err| api_internal("failed to load settings", &err))?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    request_body = SettingsUpdateRequest,
    responses(
        (status = 200, description = "Settings saved", body = HotelSettings),
        (status = 400, description = "Invalid tax rate, currency or time", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Admin only", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SettingsUpdateRequest>, JsonRejection>,
) -> Result<Json<HotelSettings>, ApiError> {
    let admin = require_admin(&state, &headers).await?;
    let body = parse_body(body)?;
    let current = state
        .store
        .get_settings()
        .await
        .map_err(|err| api_internal("failed to load settings", &err))?;
    let updated = apply_update(current, body)?;
    let saved = state
        .store
        .put_settings(updated)
        .await
        .map_err(|err| api_internal("failed to save settings", &err))?;
    tracing::info!(
        admin_id = %admin.user_id,
        tax_rate = %saved.tax_rate,
        currency = %saved.currency,
        "hotel settings updated"
    );
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn partial_update_keeps_other_fields() {
        let body = SettingsUpdateRequest {
            tax_rate: Some(dec!(0.125)),
            currency: Some("eur".to_string()),
            check_in_time: Some(" 09:30 ".to_string()),
            ..SettingsUpdateRequest::default()
        };
        let updated = apply_update(HotelSettings::default(), body).expect("valid update");
        assert_eq!(updated.tax_rate, dec!(0.125));
        assert_eq!(updated.currency, "EUR");
        assert_eq!(updated.check_in_time, "09:30");
        assert_eq!(updated.check_out_time, "11:00");
        assert_eq!(updated.hotel_name, HotelSettings::default().hotel_name);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let body = SettingsUpdateRequest {
            tax_rate: Some(dec!(1.5)),
            ..SettingsUpdateRequest::default()
        };
        let err = apply_update(HotelSettings::default(), body).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);

        let body = SettingsUpdateRequest {
            check_out_time: Some("25:00".to_string()),
            ..SettingsUpdateRequest::default()
        };
        let err = apply_update(HotelSettings::default(), body).unwrap_err();
        assert!(err.body.message.contains("check_out_time"));

        let body = SettingsUpdateRequest {
            currency: Some("u$d".to_string()),
            ..SettingsUpdateRequest::default()
        };
        assert!(apply_update(HotelSettings::default(), body).is_err());
    }
}
