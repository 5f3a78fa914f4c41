//! Storage abstraction for the front-desk service.
//!
//! # Purpose
//! Defines the [`HotelStore`] trait every backend implements and the error
//! type handlers map onto HTTP responses.
//!
//! # Key invariants
//! - Stores persist records as given; status rules live in `lodge_core` and
//!   the handlers. The only checks a store makes are uniqueness (user email,
//!   room number, one invoice per booking) and, when asked, booking overlap.
//! - References between records are plain ids. Deleting a room does not
//!   touch its bookings.
use crate::model::{
    Booking, BookingFilter, HotelSettings, HousekeepingTask, Invoice, InvoiceFilter,
    MaintenanceFilter, MaintenanceRequest, Room, RoomFilter, Service, ServiceRequest,
    ServiceRequestFilter, TaskFilter, User, UserFilter,
};
use async_trait::async_trait;
use lodge_core::ids::{
    BookingId, InvoiceId, MaintenanceId, RoomId, ServiceId, ServiceRequestId, TaskId, UserId,
};
use lodge_core::{RoomStatus, StayRange};
use std::collections::HashMap;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".into()),
            other => StoreError::Unexpected(other.into()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Set the `frontdesk_rooms` gauge for every status from the given rooms.
pub(crate) fn publish_room_gauges<'a>(rooms: impl Iterator<Item = &'a RoomStatus>) {
    let mut counts: HashMap<RoomStatus, u64> = HashMap::new();
    for status in rooms {
        *counts.entry(*status).or_default() += 1;
    }
    for status in RoomStatus::ALL {
        let count = counts.get(status).copied().unwrap_or(0);
        metrics::gauge!("frontdesk_rooms", "status" => status.as_str()).set(count as f64);
    }
}

#[async_trait]
pub trait HotelStore: Send + Sync {
    async fn create_user(&self, user: User) -> StoreResult<User>;
    async fn get_user(&self, id: UserId) -> StoreResult<User>;
    /// Looks up by lower-cased email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;
    async fn update_user(&self, user: User) -> StoreResult<User>;
    async fn delete_user(&self, id: UserId) -> StoreResult<()>;

    async fn create_room(&self, room: Room) -> StoreResult<Room>;
    async fn get_room(&self, id: RoomId) -> StoreResult<Room>;
    /// Sorted by room number.
    async fn list_rooms(&self, filter: &RoomFilter) -> StoreResult<Vec<Room>>;
    async fn update_room(&self, room: Room) -> StoreResult<Room>;
    async fn set_room_status(&self, id: RoomId, status: RoomStatus) -> StoreResult<Room>;
    async fn delete_room(&self, id: RoomId) -> StoreResult<()>;

    /// Inserts a booking. With `reject_overlap` set, fails with
    /// [`StoreError::Conflict`] when another booking still holding the same
    /// room overlaps its dates; the check and insert happen atomically.
    async fn create_booking(&self, booking: Booking, reject_overlap: bool)
    -> StoreResult<Booking>;
    async fn get_booking(&self, id: BookingId) -> StoreResult<Booking>;
    /// Newest check-in first.
    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>>;
    async fn update_booking(&self, booking: Booking) -> StoreResult<Booking>;
    async fn delete_booking(&self, id: BookingId) -> StoreResult<()>;
    /// Rooms held by a confirmed or checked-in booking overlapping `stay`.
    async fn booked_room_ids(&self, stay: &StayRange) -> StoreResult<Vec<RoomId>>;

    /// Fails with [`StoreError::Conflict`] when the booking already has one.
    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice>;
    async fn get_invoice(&self, id: InvoiceId) -> StoreResult<Invoice>;
    async fn list_invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>>;
    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Invoice>;
    async fn delete_invoice(&self, id: InvoiceId) -> StoreResult<()>;

    async fn create_task(&self, task: HousekeepingTask) -> StoreResult<HousekeepingTask>;
    async fn get_task(&self, id: TaskId) -> StoreResult<HousekeepingTask>;
    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<HousekeepingTask>>;
    async fn update_task(&self, task: HousekeepingTask) -> StoreResult<HousekeepingTask>;
    async fn delete_task(&self, id: TaskId) -> StoreResult<()>;

    async fn create_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRequest>;
    async fn get_maintenance(&self, id: MaintenanceId) -> StoreResult<MaintenanceRequest>;
    async fn list_maintenance(
        &self,
        filter: &MaintenanceFilter,
    ) -> StoreResult<Vec<MaintenanceRequest>>;
    async fn update_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRequest>;
    async fn delete_maintenance(&self, id: MaintenanceId) -> StoreResult<()>;

    async fn create_service(&self, service: Service) -> StoreResult<Service>;
    async fn get_service(&self, id: ServiceId) -> StoreResult<Service>;
    /// Sorted by category, then name.
    async fn list_services(&self) -> StoreResult<Vec<Service>>;
    async fn update_service(&self, service: Service) -> StoreResult<Service>;
    async fn delete_service(&self, id: ServiceId) -> StoreResult<()>;

    async fn create_service_request(&self, request: ServiceRequest)
    -> StoreResult<ServiceRequest>;
    async fn get_service_request(&self, id: ServiceRequestId) -> StoreResult<ServiceRequest>;
    async fn list_service_requests(
        &self,
        filter: &ServiceRequestFilter,
    ) -> StoreResult<Vec<ServiceRequest>>;
    async fn update_service_request(
        &self,
        request: ServiceRequest,
    ) -> StoreResult<ServiceRequest>;

    /// Saved settings, or the defaults when none were saved yet.
    async fn get_settings(&self) -> StoreResult<HotelSettings>;
    async fn put_settings(&self, settings: HotelSettings) -> StoreResult<HotelSettings>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlx_errors_map_to_store_errors() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unexpected(_)
        ));
    }
}
