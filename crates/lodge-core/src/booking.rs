//! Booking lifecycle.
//!
//! ```text
//! confirmed --checkin--> checked-in --checkout--> checked-out
//!     |
//!     +--cancel--> canceled
//! ```
use crate::{DomainError, DomainResult, RoomStatus};

string_enum! {
    BookingStatus {
        Confirmed => "confirmed",
        CheckedIn => "checked-in",
        CheckedOut => "checked-out",
        Canceled => "canceled",
    }
}

string_enum! {
    /// Front-desk actions that move a booking along.
    BookingAction {
        CheckIn => "checkin",
        CheckOut => "checkout",
        Cancel => "cancel",
    }
}

impl BookingStatus {
    /// Next status for `action`, or an error when the booking is not in the
    /// one state the action applies to.
    pub fn apply(self, action: BookingAction) -> DomainResult<BookingStatus> {
        match (self, action) {
            (BookingStatus::Confirmed, BookingAction::CheckIn) => Ok(BookingStatus::CheckedIn),
            (BookingStatus::CheckedIn, BookingAction::CheckOut) => Ok(BookingStatus::CheckedOut),
            (BookingStatus::Confirmed, BookingAction::Cancel) => Ok(BookingStatus::Canceled),
            (from, action) => Err(DomainError::InvalidBookingTransition {
                from: from.to_string(),
                action: action.to_string(),
            }),
        }
    }

    /// Whether the booking still blocks its room for its dates.
    pub fn holds_inventory(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::CheckedIn)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Canceled)
    }
}

impl BookingAction {
    /// Room status the booked room moves to once the action succeeds.
    pub fn room_effect(self) -> Option<RoomStatus> {
        match self {
            BookingAction::CheckIn => Some(RoomStatus::Occupied),
            BookingAction::CheckOut => Some(RoomStatus::Cleaning),
            BookingAction::Cancel => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_and_cancel() {
        let checked_in = BookingStatus::Confirmed
            .apply(BookingAction::CheckIn)
            .unwrap();
        assert_eq!(checked_in, BookingStatus::CheckedIn);
        assert_eq!(
            checked_in.apply(BookingAction::CheckOut).unwrap(),
            BookingStatus::CheckedOut
        );
        assert_eq!(
            BookingStatus::Confirmed
                .apply(BookingAction::Cancel)
                .unwrap(),
            BookingStatus::Canceled
        );
    }

    #[test]
    fn every_other_transition_is_rejected() {
        let allowed = [
            (BookingStatus::Confirmed, BookingAction::CheckIn),
            (BookingStatus::CheckedIn, BookingAction::CheckOut),
            (BookingStatus::Confirmed, BookingAction::Cancel),
        ];
        for status in BookingStatus::ALL {
            for action in BookingAction::ALL {
                let result = status.apply(*action);
                assert_eq!(
                    result.is_ok(),
                    allowed.contains(&(*status, *action)),
                    "{status} + {action}"
                );
            }
        }
    }

    #[test]
    fn inventory_and_room_effects() {
        assert!(BookingStatus::Confirmed.holds_inventory());
        assert!(BookingStatus::CheckedIn.holds_inventory());
        assert!(!BookingStatus::CheckedOut.holds_inventory());
        assert!(!BookingStatus::Canceled.holds_inventory());
        assert_eq!(
            BookingAction::CheckIn.room_effect(),
            Some(RoomStatus::Occupied)
        );
        assert_eq!(
            BookingAction::CheckOut.room_effect(),
            Some(RoomStatus::Cleaning)
        );
        assert_eq!(BookingAction::Cancel.room_effect(), None);
    }
}
