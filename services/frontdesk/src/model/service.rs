//! Guest service catalog and the requests guests raise against it.
use chrono::{DateTime, Utc};
use lodge_core::ServiceRequestStatus;
use lodge_core::ids::{BookingId, ServiceId, ServiceRequestId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    /// Unavailable services stay listed but cannot be requested.
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ServiceRequest {
    pub id: ServiceRequestId,
    pub guest_id: UserId,
    pub service_id: ServiceId,
    pub booking_id: BookingId,
    pub status: ServiceRequestStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
