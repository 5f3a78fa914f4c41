//! Front-desk data model.
//!
//! # Purpose
//! Stored records for users, rooms, bookings, invoices, housekeeping,
//! maintenance, the service catalog and hotel settings, plus the list filters
//! the store layer accepts.
mod booking;
mod filters;
mod housekeeping;
mod invoice;
mod maintenance;
mod room;
mod service;
mod settings;
mod user;

pub use booking::Booking;
pub use filters::{
    BookingFilter, InvoiceFilter, MaintenanceFilter, RoomFilter, ServiceRequestFilter, TaskFilter,
    UserFilter,
};
pub use housekeeping::HousekeepingTask;
pub use invoice::Invoice;
pub use maintenance::MaintenanceRequest;
pub use room::Room;
pub use service::{Service, ServiceRequest};
pub use settings::HotelSettings;
pub use user::{ContactInfo, Preferences, User, UserProfile};
