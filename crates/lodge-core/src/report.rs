//! Dashboard overview: a single pass over the current records.
use crate::pricing::overflow;
use crate::{BookingStatus, DomainResult, PaymentStatus, RoomStatus, round_money};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Confirmed arrivals within this many days (today included) count as
/// upcoming check-ins.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy)]
pub struct BookingFacts {
    pub status: BookingStatus,
    pub check_in: NaiveDate,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceFacts {
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
}

/// Everything the overview is reduced from.
#[derive(Debug, Clone, Default)]
pub struct OverviewInputs {
    pub today: Option<NaiveDate>,
    pub total_guests: u64,
    pub rooms: Vec<RoomStatus>,
    pub bookings: Vec<BookingFacts>,
    pub invoices: Vec<InvoiceFacts>,
    pub open_maintenance: u64,
    pub pending_housekeeping: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RoomStatusTally {
    pub available: u64,
    pub occupied: u64,
    pub cleaning: u64,
    pub maintenance: u64,
}

impl RoomStatusTally {
    fn record(&mut self, status: RoomStatus) {
        match status {
            RoomStatus::Available => self.available += 1,
            RoomStatus::Occupied => self.occupied += 1,
            RoomStatus::Cleaning => self.cleaning += 1,
            RoomStatus::Maintenance => self.maintenance += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookingStatusTally {
    pub confirmed: u64,
    #[serde(rename = "checked-in")]
    pub checked_in: u64,
    #[serde(rename = "checked-out")]
    pub checked_out: u64,
    pub canceled: u64,
}

impl BookingStatusTally {
    fn record(&mut self, status: BookingStatus) {
        match status {
            BookingStatus::Confirmed => self.confirmed += 1,
            BookingStatus::CheckedIn => self.checked_in += 1,
            BookingStatus::CheckedOut => self.checked_out += 1,
            BookingStatus::Canceled => self.canceled += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Overview {
    pub total_bookings: u64,
    pub total_guests: u64,
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
    #[schema(value_type = f64)]
    pub outstanding_revenue: Decimal,
    pub room_status: RoomStatusTally,
    /// Occupied rooms over all rooms, 0.0 when there are no rooms.
    pub occupancy_rate: f64,
    pub bookings_by_status: BookingStatusTally,
    pub upcoming_check_ins: u64,
    #[schema(value_type = f64)]
    pub projected_revenue: Decimal,
    pub open_maintenance: u64,
    pub pending_housekeeping: u64,
}

pub fn summarize(inputs: &OverviewInputs) -> DomainResult<Overview> {
    let mut room_status = RoomStatusTally::default();
    for status in &inputs.rooms {
        room_status.record(*status);
    }
    let occupancy_rate = if inputs.rooms.is_empty() {
        0.0
    } else {
        room_status.occupied as f64 / inputs.rooms.len() as f64
    };

    let window = inputs.today.map(|today| {
        let end = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        (today, end)
    });

    let mut bookings_by_status = BookingStatusTally::default();
    let mut upcoming_check_ins = 0;
    let mut projected_revenue = Decimal::ZERO;
    for booking in &inputs.bookings {
        bookings_by_status.record(booking.status);
        if booking.status.holds_inventory() {
            projected_revenue = projected_revenue
                .checked_add(booking.total_amount)
                .ok_or_else(|| overflow("projected revenue"))?;
        }
        if booking.status == BookingStatus::Confirmed
            && let Some((start, end)) = window
            && booking.check_in >= start
            && booking.check_in < end
        {
            upcoming_check_ins += 1;
        }
    }

    let mut total_revenue = Decimal::ZERO;
    let mut outstanding_revenue = Decimal::ZERO;
    for invoice in &inputs.invoices {
        let (bucket, what) = match invoice.payment_status {
            PaymentStatus::Paid => (&mut total_revenue, "total revenue"),
            PaymentStatus::Pending => (&mut outstanding_revenue, "outstanding revenue"),
        };
        *bucket = bucket
            .checked_add(invoice.total_amount)
            .ok_or_else(|| overflow(what))?;
    }

    Ok(Overview {
        total_bookings: inputs.bookings.len() as u64,
        total_guests: inputs.total_guests,
        total_revenue: round_money(total_revenue),
        outstanding_revenue: round_money(outstanding_revenue),
        room_status,
        occupancy_rate,
        bookings_by_status,
        upcoming_check_ins,
        projected_revenue: round_money(projected_revenue),
        open_maintenance: inputs.open_maintenance,
        pending_housekeeping: inputs.pending_housekeeping,
    })
}
