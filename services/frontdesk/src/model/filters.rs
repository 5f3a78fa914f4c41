//! Optional list filters. `None` fields match everything.
use lodge_core::ids::{BookingId, RoomId, UserId};
use lodge_core::{
    BookingStatus, HousekeepingStatus, MaintenanceStatus, Role, RoomStatus, RoomType,
    ServiceRequestStatus,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub room_type: Option<RoomType>,
    #[param(value_type = Option<String>)]
    pub status: Option<RoomStatus>,
}

impl RoomFilter {
    pub fn matches(&self, room: &crate::model::Room) -> bool {
        self.room_type.is_none_or(|kind| room.room_type == kind)
            && self.status.is_none_or(|status| room.status == status)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingFilter {
    #[param(value_type = Option<String>)]
    pub guest_id: Option<UserId>,
    #[param(value_type = Option<String>)]
    pub room_id: Option<RoomId>,
    #[param(value_type = Option<String>)]
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &crate::model::Booking) -> bool {
        self.guest_id.is_none_or(|id| booking.guest_id == id)
            && self.room_id.is_none_or(|id| booking.room_id == id)
            && self.status.is_none_or(|status| booking.status == status)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceFilter {
    #[param(value_type = Option<String>)]
    pub guest_id: Option<UserId>,
    #[param(value_type = Option<String>)]
    pub booking_id: Option<BookingId>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &crate::model::Invoice) -> bool {
        self.guest_id.is_none_or(|id| invoice.guest_id == id)
            && self.booking_id.is_none_or(|id| invoice.booking_id == id)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskFilter {
    #[param(value_type = Option<String>)]
    pub status: Option<HousekeepingStatus>,
    #[param(value_type = Option<String>)]
    pub assigned_to: Option<UserId>,
    #[param(value_type = Option<String>)]
    pub room_id: Option<RoomId>,
}

impl TaskFilter {
    pub fn matches(&self, task: &crate::model::HousekeepingTask) -> bool {
        self.status.is_none_or(|status| task.status == status)
            && self.assigned_to.is_none_or(|id| task.assigned_to == Some(id))
            && self.room_id.is_none_or(|id| task.room_id == id)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceFilter {
    #[param(value_type = Option<String>)]
    pub status: Option<MaintenanceStatus>,
    #[param(value_type = Option<String>)]
    pub assigned_to: Option<UserId>,
    #[param(value_type = Option<String>)]
    pub room_id: Option<RoomId>,
}

impl MaintenanceFilter {
    pub fn matches(&self, request: &crate::model::MaintenanceRequest) -> bool {
        self.status.is_none_or(|status| request.status == status)
            && self.assigned_to.is_none_or(|id| request.assigned_to == Some(id))
            && self.room_id.is_none_or(|id| request.room_id == id)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceRequestFilter {
    #[param(value_type = Option<String>)]
    pub guest_id: Option<UserId>,
    #[param(value_type = Option<String>)]
    pub booking_id: Option<BookingId>,
    #[param(value_type = Option<String>)]
    pub status: Option<ServiceRequestStatus>,
}

impl ServiceRequestFilter {
    pub fn matches(&self, request: &crate::model::ServiceRequest) -> bool {
        self.guest_id.is_none_or(|id| request.guest_id == id)
            && self.booking_id.is_none_or(|id| request.booking_id == id)
            && self.status.is_none_or(|status| request.status == status)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    #[param(value_type = Option<String>)]
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn matches(&self, user: &crate::model::User) -> bool {
        self.role.is_none_or(|role| user.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Room;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn room(room_type: RoomType, status: RoomStatus) -> Room {
        let now = Utc::now();
        Room {
            id: RoomId::new(),
            room_number: "101".to_string(),
            room_type,
            floor: 1,
            price: Decimal::new(100, 0),
            beds: 1,
            status,
            amenities: vec![],
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn room_filter_matches_on_every_set_field() {
        let suite = room(RoomType::Suite, RoomStatus::Available);
        assert!(RoomFilter::default().matches(&suite));
        let filter = RoomFilter {
            room_type: Some(RoomType::Suite),
            status: Some(RoomStatus::Occupied),
        };
        assert!(!filter.matches(&suite));
        let filter = RoomFilter {
            room_type: Some(RoomType::Suite),
            status: None,
        };
        assert!(filter.matches(&suite));
    }

    #[test]
    fn query_strings_decode_into_filters() {
        let filter: RoomFilter =
            serde_json::from_value(serde_json::json!({"type": "deluxe", "status": "cleaning"}))
                .unwrap();
        assert_eq!(filter.room_type, Some(RoomType::Deluxe));
        assert_eq!(filter.status, Some(RoomStatus::Cleaning));
    }
}
