//! Front-desk HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::token::TokenKeys;
use crate::config::UploadConfig;
use crate::observability;
use crate::store::HotelStore;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

/// Multipart framing on top of the configured photo size.
const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn HotelStore + Send + Sync>,
    pub tokens: Arc<TokenKeys>,
    pub token_ttl: Duration,
    pub uploads: UploadConfig,
    /// Refuse a booking whose dates overlap another live booking of the
    /// same room.
    pub reject_overlapping_bookings: bool,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });
    let upload_limit = state.uploads.max_bytes + UPLOAD_BODY_OVERHEAD;

    Router::new()
        .route("/health", axum::routing::get(api::system::health))
        .route("/auth/register", axum::routing::post(api::auth::register))
        .route("/auth/login", axum::routing::post(api::auth::login))
        .route(
            "/rooms",
            axum::routing::get(api::rooms::list_rooms).post(api::rooms::create_room),
        )
        .route(
            "/rooms/availability",
            axum::routing::get(api::rooms::available_rooms),
        )
        .route(
            "/rooms/:room_id",
            axum::routing::get(api::rooms::get_room)
                .put(api::rooms::update_room)
                .delete(api::rooms::delete_room),
        )
        .route(
            "/rooms/:room_id/status",
            axum::routing::put(api::rooms::set_room_status),
        )
        .route(
            "/reservations",
            axum::routing::get(api::reservations::list_reservations)
                .post(api::reservations::create_reservation),
        )
        .route(
            "/reservations/:booking_id",
            axum::routing::get(api::reservations::get_reservation)
                .delete(api::reservations::delete_reservation),
        )
        .route(
            "/reservations/:booking_id/checkin",
            axum::routing::put(api::reservations::check_in),
        )
        .route(
            "/reservations/:booking_id/checkout",
            axum::routing::put(api::reservations::check_out),
        )
        .route(
            "/reservations/:booking_id/cancel",
            axum::routing::put(api::reservations::cancel),
        )
        .route(
            "/invoices",
            axum::routing::get(api::invoices::list_invoices).post(api::invoices::create_invoice),
        )
        .route(
            "/invoices/:invoice_id",
            axum::routing::get(api::invoices::get_invoice).delete(api::invoices::delete_invoice),
        )
        .route(
            "/invoices/:invoice_id/payment",
            axum::routing::put(api::invoices::update_payment),
        )
        .route(
            "/housekeeping",
            axum::routing::get(api::housekeeping::list_tasks)
                .post(api::housekeeping::create_task),
        )
        .route(
            "/housekeeping/:task_id",
            axum::routing::delete(api::housekeeping::delete_task),
        )
        .route(
            "/housekeeping/:task_id/assign",
            axum::routing::put(api::housekeeping::assign_task),
        )
        .route(
            "/housekeeping/:task_id/status",
            axum::routing::put(api::housekeeping::update_task_status),
        )
        .route(
            "/maintenance",
            axum::routing::get(api::maintenance::list_requests)
                .post(api::maintenance::report_issue),
        )
        .route(
            "/maintenance/:request_id",
            axum::routing::delete(api::maintenance::delete_request),
        )
        .route(
            "/maintenance/:request_id/assign",
            axum::routing::put(api::maintenance::assign_request),
        )
        .route(
            "/maintenance/:request_id/status",
            axum::routing::put(api::maintenance::update_request_status),
        )
        .route(
            "/services",
            axum::routing::get(api::services::list_services).post(api::services::create_service),
        )
        .route(
            "/services/:service_id",
            axum::routing::put(api::services::update_service)
                .delete(api::services::delete_service),
        )
        .route(
            "/service-requests",
            axum::routing::get(api::service_requests::list_service_requests)
                .post(api::service_requests::create_service_request),
        )
        .route(
            "/service-requests/:request_id/status",
            axum::routing::put(api::service_requests::update_service_request_status),
        )
        .route("/users", axum::routing::get(api::users::list_users))
        .route(
            "/users/me",
            axum::routing::get(api::users::get_me).put(api::users::update_me),
        )
        .route(
            "/users/me/password",
            axum::routing::put(api::users::change_password),
        )
        .route(
            "/users/me/photo",
            axum::routing::post(api::users::upload_photo)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/users/:user_id",
            axum::routing::get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/reports/overview",
            axum::routing::get(api::reports::overview),
        )
        .route(
            "/settings",
            axum::routing::get(api::settings::get_settings).put(api::settings::update_settings),
        )
        .nest_service("/uploads", ServeDir::new(&state.uploads.dir))
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(trace_layer)
        .with_state(state)
}
