//! Dashboard overview for staff.
use crate::api::error::{ApiError, api_domain_error, api_internal};
use crate::app::AppState;
use crate::auth::guard::require_staff;
use crate::model::{BookingFilter, InvoiceFilter, MaintenanceFilter, RoomFilter, TaskFilter, UserFilter};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use lodge_core::{
    BookingFacts, HousekeepingStatus, InvoiceFacts, Overview, OverviewInputs, Role, summarize,
};

/// Reads every record the overview needs. Counts are taken from full
/// listings; the hotel is small enough that this stays cheap.
async fn overview_inputs(state: &AppState) -> Result<OverviewInputs, ApiError> {
    let guests = state
        .store
        .list_users(&UserFilter {
            role: Some(Role::Guest),
        })
        .await
        .map_err(|err| api_internal("failed to load guests", &err))?;
    let rooms = state
        .store
        .list_rooms(&RoomFilter::default())
        .await
        .map_err(|err| api_internal("failed to load rooms", &err))?;
    let bookings = state
        .store
        .list_bookings(&BookingFilter::default())
        .await
        .map_err(|err| api_internal("failed to load reservations", &err))?;
    let invoices = state
        .store
        .list_invoices(&InvoiceFilter::default())
        .await
        .map_err(|err| api_internal("failed to load invoices", &err))?;
    let maintenance = state
        .store
        .list_maintenance(&MaintenanceFilter::default())
        .await
        .map_err(|err| api_internal("failed to load maintenance requests", &err))?;
    let pending_tasks = state
        .store
        .list_tasks(&TaskFilter {
            status: Some(HousekeepingStatus::Pending),
            ..TaskFilter::default()
        })
        .await
        .map_err(|err| api_internal("failed to load housekeeping tasks", &err))?;

    Ok(OverviewInputs {
        today: Some(Utc::now().date_naive()),
        total_guests: guests.len() as u64,
        rooms: rooms.iter().map(|room| room.status).collect(),
        bookings: bookings
            .iter()
            .map(|booking| BookingFacts {
                status: booking.status,
                check_in: booking.check_in,
                total_amount: booking.total_amount,
            })
            .collect(),
        invoices: invoices
            .iter()
            .map(|invoice| InvoiceFacts {
                payment_status: invoice.payment_status,
                total_amount: invoice.total_amount,
            })
            .collect(),
        open_maintenance: maintenance
            .iter()
            .filter(|request| request.status.is_open())
            .count() as u64,
        pending_housekeeping: pending_tasks.len() as u64,
    })
}

#[utoipa::path(
    get,
    path = "/reports/overview",
    tag = "reports",
    responses(
        (status = 200, description = "Occupancy, revenue and workload figures", body = Overview),
        (status = 403, description = "Staff only", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Overview>, ApiError> {
    require_staff(&state, &headers).await?;
    let inputs = overview_inputs(&state).await?;
    let overview = summarize(&inputs).map_err(|err| api_domain_error(&err))?;
    Ok(Json(overview))
}
