//! Lodge domain rules shared by the front-desk service and its tests.
//!
//! # Purpose
//! Holds the hotel vocabulary (ids, status enums, roles) together with the few
//! pieces of actual logic the backend has: stay date ranges and their overlap
//! test, stay pricing, the booking/payment/task state machines, dashboard
//! routing and the reporting reduce.
//!
//! # Key invariants
//! - Stay ranges are half-open: a stay ending on the 12th does not overlap one
//!   starting on the 12th.
//! - Booking statuses only move forward; cancellation is only possible from
//!   `confirmed`.
//! - Money is `Decimal`, rounded to cents half away from zero.
//!
//! # Examples
//! ```rust
//! use chrono::NaiveDate;
//! use lodge_core::StayRange;
//!
//! let jan = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let booked = StayRange::new(jan(10), jan(12)).unwrap();
//! assert!(booked.overlaps(&StayRange::new(jan(11), jan(13)).unwrap()));
//! assert!(!booked.overlaps(&StayRange::new(jan(13), jan(15)).unwrap()));
//! ```

/// Declares a closed string-coded enum with serde, OpenAPI and `FromStr`
/// support. The string is the wire and storage form of each variant.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::DomainError::UnknownValue {
                        kind: stringify!($name),
                        value: value.to_string(),
                    }),
                }
            }
        }
    };
}

mod billing;
mod booking;
mod errors;
pub mod ids;
mod pricing;
mod report;
mod roles;
mod room;
mod stay;
mod tasks;

pub use billing::{InvoiceTotals, LineItem, PaymentChange, PaymentStatus};
pub use booking::{BookingAction, BookingStatus};
pub use errors::{DomainError, DomainResult};
pub use pricing::{
    DEFAULT_TAX_RATE, MAX_AMOUNT, bounded_money, round_money, stay_total, validate_tax_rate,
};
pub use report::{
    BookingFacts, BookingStatusTally, InvoiceFacts, Overview, OverviewInputs, RoomStatusTally,
    UPCOMING_WINDOW_DAYS, summarize,
};
pub use roles::{Department, Role, Theme, UserStatus, dashboard_route};
pub use room::{RoomStatus, RoomType};
pub use stay::{MAX_NIGHTS, StayRange};
pub use tasks::{
    HousekeepingStatus, MaintenancePriority, MaintenanceStatus, ServiceRequestStatus, TaskKind,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn string_enums_use_wire_names() {
        assert_eq!(BookingStatus::CheckedIn.as_str(), "checked-in");
        assert_eq!(
            serde_json::to_string(&HousekeepingStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            Department::from_str("front-office").unwrap(),
            Department::FrontOffice
        );
    }

    #[test]
    fn string_enums_reject_unknown_values() {
        let err = RoomType::from_str("penthouse").unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnknownValue { kind: "RoomType", .. }
        ));
    }
}
