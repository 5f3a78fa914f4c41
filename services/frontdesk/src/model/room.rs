use chrono::{DateTime, Utc};
use lodge_core::ids::RoomId;
use lodge_core::{RoomStatus, RoomType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub floor: i32,
    /// Nightly rate before tax.
    pub price: Decimal,
    pub beds: i32,
    pub status: RoomStatus,
    pub amenities: Vec<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
