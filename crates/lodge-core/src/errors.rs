use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("check-out ({check_out}) must be after check-in ({check_in})")]
    InvalidStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("a stay of {nights} nights exceeds the limit of {max}")]
    StayTooLong { nights: i64, max: i64 },
    #[error("cannot {action} a booking that is {from}")]
    InvalidBookingTransition { from: String, action: String },
    #[error("cannot move {kind} from {from} to {to}")]
    InvalidStatusTransition {
        kind: &'static str,
        from: String,
        to: String,
    },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("{0}")]
    Invalid(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let errors = vec![
            DomainError::UnknownValue {
                kind: "Role",
                value: "owner".to_string(),
            },
            DomainError::InvalidStay {
                check_in: date,
                check_out: date,
            },
            DomainError::StayTooLong {
                nights: 400,
                max: 365,
            },
            DomainError::InvalidBookingTransition {
                from: "canceled".to_string(),
                action: "checkin".to_string(),
            },
            DomainError::InvalidStatusTransition {
                kind: "payment",
                from: "paid".to_string(),
                to: "pending".to_string(),
            },
            DomainError::InvalidAmount("negative".to_string()),
            DomainError::Invalid("bad".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
