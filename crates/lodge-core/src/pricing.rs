use crate::{DomainError, DomainResult, StayRange};
use rust_decimal::{Decimal, RoundingStrategy};

/// Tax rate applied when the hotel settings have never been edited.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Largest amount a money column holds (`NUMERIC(12,2)`).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rounds to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to cents and checks the result fits a money column.
pub fn bounded_money(amount: Decimal) -> DomainResult<Decimal> {
    let amount = round_money(amount);
    if amount < Decimal::ZERO {
        return Err(DomainError::InvalidAmount(format!("{amount} is negative")));
    }
    if amount > MAX_AMOUNT {
        return Err(DomainError::InvalidAmount(format!(
            "{amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    Ok(amount)
}

pub(crate) fn overflow(what: &str) -> DomainError {
    DomainError::InvalidAmount(format!("{what} is too large"))
}

/// Total for a stay: nights × nightly rate × (1 + tax), rounded to cents.
pub fn stay_total(
    stay: &StayRange,
    nightly_rate: Decimal,
    tax_rate: Decimal,
) -> DomainResult<Decimal> {
    let total = nightly_rate
        .checked_mul(Decimal::from(stay.nights()))
        .and_then(|subtotal| subtotal.checked_mul(Decimal::ONE + tax_rate))
        .ok_or_else(|| overflow("stay total"))?;
    bounded_money(total)
}

pub fn validate_tax_rate(rate: Decimal) -> DomainResult<Decimal> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DomainError::InvalidAmount(format!(
            "tax rate {rate} must be between 0 and 1"
        )));
    }
    Ok(rate)
}
