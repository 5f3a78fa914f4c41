//! Invoice handlers.
//!
//! # Purpose
//! Issue one invoice per checked-out reservation, list and fetch invoices
//! (guest scoped), and settle payments.
//!
//! # Key invariants
//! - Room charges equal the reservation total; service charges are the sum
//!   of the line items; the invoice total is their sum.
//! - Payment only moves `pending → paid`; repeating `paid` is a no-op.
use crate::api::error::{
    ApiError, api_conflict, api_domain_error, api_forbidden, api_internal, api_not_found,
    api_validation_error,
};
use crate::api::types::{
    InvoiceCreateRequest, InvoiceListResponse, InvoiceServiceItem, PaymentUpdateRequest,
};
use crate::api::{load_booking, parse_body, parse_query};
use crate::app::AppState;
use crate::auth::guard::{require_admin, require_principal, require_staff};
use crate::model::{Booking, Invoice, InvoiceFilter, ServiceRequestFilter};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use lodge_core::ids::{InvoiceId, ServiceId};
use lodge_core::{
    BookingStatus, InvoiceTotals, LineItem, PaymentChange, PaymentStatus, ServiceRequestStatus,
};

async fn load_invoice(state: &AppState, id: InvoiceId) -> Result<Invoice, ApiError> {
    match state.store.get_invoice(id).await {
        Ok(invoice) => Ok(invoice),
        Err(StoreError::NotFound(_)) => Err(api_not_found("invoice not found")),
        Err(err) => Err(api_internal("failed to load invoice", &err)),
    }
}

/// Fold requested quantities per service, keeping first-seen order.
fn merge_quantities(items: &[InvoiceServiceItem]) -> Vec<(ServiceId, u32)> {
    let mut merged: Vec<(ServiceId, u32)> = Vec::new();
    for item in items {
        match merged.iter_mut().find(|(id, _)| *id == item.service_id) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(item.quantity),
            None => merged.push((item.service_id, item.quantity)),
        }
    }
    merged
}

/// Quantities to bill when the request names no services: one per completed
/// service request on the reservation.
async fn completed_request_quantities(
    state: &AppState,
    booking: &Booking,
) -> Result<Vec<(ServiceId, u32)>, ApiError> {
    let filter = ServiceRequestFilter {
        guest_id: None,
        booking_id: Some(booking.id),
        status: Some(ServiceRequestStatus::Completed),
    };
    let requests = state
        .store
        .list_service_requests(&filter)
        .await
        .map_err(|err| api_internal("failed to load service requests", &err))?;
    let items: Vec<InvoiceServiceItem> = requests
        .iter()
        .map(|request| InvoiceServiceItem {
            service_id: request.service_id,
            quantity: 1,
        })
        .collect();
    Ok(merge_quantities(&items))
}

async fn line_items(
    state: &AppState,
    quantities: Vec<(ServiceId, u32)>,
    explicit: bool,
) -> Result<Vec<LineItem>, ApiError> {
    let mut items = Vec::with_capacity(quantities.len());
    for (service_id, quantity) in quantities {
        let service = match state.store.get_service(service_id).await {
            Ok(service) => service,
            Err(StoreError::NotFound(_)) if explicit => {
                return Err(api_not_found("service not found"));
            }
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(service_id = %service_id, "completed request for a deleted service");
                continue;
            }
            Err(err) => return Err(api_internal("failed to load service", &err)),
        };
        let item = LineItem::new(service.id, service.name, service.price, quantity)
            .map_err(|err| api_domain_error(&err))?;
        items.push(item);
    }
    Ok(items)
}

#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    params(InvoiceFilter),
    responses(
        (status = 200, description = "Invoices; guests only see their own", body = InvoiceListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_invoices(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<InvoiceFilter>, QueryRejection>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let mut filter = parse_query(filter)?;
    if let Some(own) = principal.scope() {
        filter.guest_id = Some(own);
    }
    let items = state
        .store
        .list_invoices(&filter)
        .await
        .map_err(|err| api_internal("failed to list invoices", &err))?;
    Ok(Json(InvoiceListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/invoices/{invoice_id}",
    tag = "invoices",
    params(("invoice_id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice", body = Invoice),
        (status = 403, description = "Not the guest's invoice", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Invoice not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_invoice(
    Path(invoice_id): Path<InvoiceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Invoice>, ApiError> {
    let principal = require_principal(&state, &headers).await?;
    let invoice = load_invoice(&state, invoice_id).await?;
    if !principal.can_access(invoice.guest_id) {
        return Err(api_forbidden("not your invoice"));
    }
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/invoices",
    tag = "invoices",
    request_body = InvoiceCreateRequest,
    responses(
        (status = 201, description = "Invoice issued", body = Invoice),
        (status = 400, description = "Reservation not checked out or bad line item", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Reservation or service not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Reservation already invoiced", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<InvoiceCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let booking = load_booking(&state, body.booking_id).await?;
    if booking.status != BookingStatus::CheckedOut {
        return Err(api_validation_error(&format!(
            "reservation is {}; only checked-out reservations can be invoiced",
            booking.status
        )));
    }
    let items = match &body.services {
        Some(services) => line_items(&state, merge_quantities(services), true).await?,
        None => {
            let quantities = completed_request_quantities(&state, &booking).await?;
            line_items(&state, quantities, false).await?
        }
    };
    let totals = InvoiceTotals::compute(booking.total_amount, &items)
        .map_err(|err| api_domain_error(&err))?;
    let invoice = Invoice {
        id: InvoiceId::new(),
        booking_id: booking.id,
        guest_id: booking.guest_id,
        room_charges: totals.room_charges,
        additional_services_charges: totals.additional_services_charges,
        line_items: items,
        total_amount: totals.total_amount,
        payment_status: PaymentStatus::Pending,
        issued_at: Utc::now(),
        paid_at: None,
    };
    match state.store.create_invoice(invoice).await {
        Ok(created) => {
            metrics::counter!("frontdesk_invoices_issued_total").increment(1);
            tracing::info!(
                invoice_id = %created.id,
                booking_id = %created.booking_id,
                total = %created.total_amount,
                "invoice issued"
            );
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(StoreError::Conflict(_)) => Err(api_conflict(
            "already_invoiced",
            "an invoice already exists for this reservation",
        )),
        Err(err) => Err(api_internal("failed to create invoice", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/invoices/{invoice_id}/payment",
    tag = "invoices",
    params(("invoice_id" = String, Path, description = "Invoice id")),
    request_body = PaymentUpdateRequest,
    responses(
        (status = 200, description = "Payment status after the update", body = Invoice),
        (status = 400, description = "Paid invoices cannot be reopened", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Invoice not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_payment(
    Path(invoice_id): Path<InvoiceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PaymentUpdateRequest>, JsonRejection>,
) -> Result<Json<Invoice>, ApiError> {
    require_staff(&state, &headers).await?;
    let body = parse_body(body)?;
    let mut invoice = load_invoice(&state, invoice_id).await?;
    match invoice
        .payment_status
        .apply(body.payment_status)
        .map_err(|err| api_domain_error(&err))?
    {
        PaymentChange::Unchanged => Ok(Json(invoice)),
        PaymentChange::Settled => {
            invoice.payment_status = PaymentStatus::Paid;
            invoice.paid_at = Some(Utc::now());
            match state.store.update_invoice(invoice).await {
                Ok(updated) => {
                    metrics::counter!("frontdesk_invoices_paid_total").increment(1);
                    tracing::info!(invoice_id = %updated.id, "invoice paid");
                    Ok(Json(updated))
                }
                Err(StoreError::NotFound(_)) => Err(api_not_found("invoice not found")),
                Err(err) => Err(api_internal("failed to update invoice", &err)),
            }
        }
    }
}

#[utoipa::path(
    delete,
    path = "/invoices/{invoice_id}",
    tag = "invoices",
    params(("invoice_id" = String, Path, description = "Invoice id")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_invoice(
    Path(invoice_id): Path<InvoiceId>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    match state.store.delete_invoice(invoice_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("invoice not found")),
        Err(err) => Err(api_internal("failed to delete invoice", &err)),
    }
}
