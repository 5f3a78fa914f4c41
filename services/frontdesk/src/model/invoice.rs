use chrono::{DateTime, Utc};
use lodge_core::ids::{BookingId, InvoiceId, UserId};
use lodge_core::{LineItem, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub booking_id: BookingId,
    pub guest_id: UserId,
    pub room_charges: Decimal,
    pub additional_services_charges: Decimal,
    pub line_items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}
