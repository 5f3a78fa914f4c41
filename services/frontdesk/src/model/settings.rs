use chrono::{DateTime, Utc};
use lodge_core::DEFAULT_TAX_RATE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hotel-wide settings. There is exactly one record; until an admin saves
/// one, stores hand out [`HotelSettings::default`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HotelSettings {
    pub hotel_name: String,
    /// ISO 4217 code.
    pub currency: String,
    /// Fraction applied on top of room charges, e.g. `0.10`.
    pub tax_rate: Decimal,
    /// `HH:MM`, local hotel time.
    pub check_in_time: String,
    pub check_out_time: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for HotelSettings {
    fn default() -> Self {
        Self {
            hotel_name: "Lodge Hotel".to_string(),
            currency: "USD".to_string(),
            tax_rate: DEFAULT_TAX_RATE,
            check_in_time: "14:00".to_string(),
            check_out_time: "11:00".to_string(),
            updated_at: None,
        }
    }
}
