use crate::{DomainError, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest stay accepted in one booking.
pub const MAX_NIGHTS: i64 = 365;

/// A stay from check-in day up to, not including, check-out day.
///
/// Construction rejects empty and inverted ranges, so every `StayRange`
/// covers at least one night and at most [`MAX_NIGHTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        if check_out <= check_in {
            return Err(DomainError::InvalidStay {
                check_in,
                check_out,
            });
        }
        let nights = (check_out - check_in).num_days();
        if nights > MAX_NIGHTS {
            return Err(DomainError::StayTooLong {
                nights,
                max: MAX_NIGHTS,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.overlaps_dates(other.check_in, other.check_out)
    }

    /// Half-open overlap against raw dates, used for stored bookings that
    /// were never re-validated.
    pub fn overlaps_dates(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in < self.check_out && check_out > self.check_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(StayRange::new(jan(10), jan(10)).is_err());
        assert!(matches!(
            StayRange::new(jan(12), jan(10)),
            Err(DomainError::InvalidStay { .. })
        ));
    }

    #[test]
    fn counts_nights() {
        assert_eq!(StayRange::new(jan(10), jan(12)).unwrap().nights(), 2);
        let across_month = StayRange::new(jan(30), NaiveDate::from_ymd_opt(2025, 2, 2).unwrap())
            .unwrap();
        assert_eq!(across_month.nights(), 3);
    }

    #[test]
    fn overlapping_and_back_to_back_stays() {
        let booked = StayRange::new(jan(10), jan(12)).unwrap();
        assert!(booked.overlaps(&StayRange::new(jan(11), jan(13)).unwrap()));
        assert!(booked.overlaps(&StayRange::new(jan(9), jan(11)).unwrap()));
        assert!(booked.overlaps(&StayRange::new(jan(1), jan(20)).unwrap()));
        assert!(!booked.overlaps(&StayRange::new(jan(12), jan(14)).unwrap()));
        assert!(!booked.overlaps(&StayRange::new(jan(13), jan(15)).unwrap()));
        assert!(!booked.overlaps(&StayRange::new(jan(8), jan(10)).unwrap()));
    }

    #[test]
    fn caps_stay_length() {
        let start = jan(1);
        let last_allowed = start + chrono::Days::new(MAX_NIGHTS as u64);
        assert_eq!(
            StayRange::new(start, last_allowed).unwrap().nights(),
            MAX_NIGHTS
        );
        assert!(matches!(
            StayRange::new(start, NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()),
            Err(DomainError::StayTooLong { max: MAX_NIGHTS, .. })
        ));
    }
}
