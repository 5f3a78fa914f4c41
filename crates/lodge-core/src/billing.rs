use crate::ids::ServiceId;
use crate::pricing::overflow;
use crate::{DomainError, DomainResult, bounded_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

string_enum! {
    PaymentStatus {
        Pending => "pending",
        Paid => "paid",
    }
}

/// Outcome of a payment status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentChange {
    /// Requested status equals the current one; nothing to write.
    Unchanged,
    /// Invoice moved from pending to paid.
    Settled,
}

impl PaymentStatus {
    /// Payments only move forward. Repeating `paid` is a no-op, reopening a
    /// paid invoice is refused.
    pub fn apply(self, requested: PaymentStatus) -> DomainResult<PaymentChange> {
        match (self, requested) {
            (PaymentStatus::Pending, PaymentStatus::Paid) => Ok(PaymentChange::Settled),
            (current, requested) if current == requested => Ok(PaymentChange::Unchanged),
            (current, requested) => Err(DomainError::InvalidStatusTransition {
                kind: "payment",
                from: current.to_string(),
                to: requested.to_string(),
            }),
        }
    }
}

/// One billed service on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub service_id: ServiceId,
    pub description: String,
    #[schema(value_type = f64)]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(
        service_id: ServiceId,
        description: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::InvalidAmount(
                "quantity must be at least 1".to_string(),
            ));
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "unit price {unit_price} is negative"
            )));
        }
        let amount = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| overflow("line item amount"))?;
        Ok(Self {
            service_id,
            description: description.into(),
            unit_price,
            quantity,
            amount: bounded_money(amount)?,
        })
    }
}

/// Money columns of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub room_charges: Decimal,
    pub additional_services_charges: Decimal,
    pub total_amount: Decimal,
}

impl InvoiceTotals {
    pub fn compute(room_charges: Decimal, items: &[LineItem]) -> DomainResult<Self> {
        let services = items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount))
            .ok_or_else(|| overflow("service charges"))?;
        let additional_services_charges = bounded_money(services)?;
        let total = room_charges
            .checked_add(additional_services_charges)
            .ok_or_else(|| overflow("invoice total"))?;
        Ok(Self {
            room_charges,
            additional_services_charges,
            total_amount: bounded_money(total)?,
        })
    }
}
