use chrono::{DateTime, NaiveDate, Utc};
use lodge_core::ids::{BookingId, RoomId, UserId};
use lodge_core::{BookingStatus, DomainResult, StayRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub guest_id: UserId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub status: BookingStatus,
    pub total_amount: Decimal,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> DomainResult<StayRange> {
        StayRange::new(self.check_in, self.check_out)
    }

    /// True when this booking still holds its room on any night of `stay`.
    pub fn blocks(&self, stay: &StayRange) -> bool {
        self.status.holds_inventory() && stay.overlaps_dates(self.check_in, self.check_out)
    }
}
