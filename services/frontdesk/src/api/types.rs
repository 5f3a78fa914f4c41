//! HTTP API request/response types.
//!
//! # Purpose
//! Payload shapes for the front-desk REST API and the OpenAPI document.
//! Request bodies derive `Validate`; handlers run it through
//! [`crate::api::parse_body`] before touching the store.
use crate::model::{
    Booking, ContactInfo, HousekeepingTask, Invoice, MaintenanceRequest, Preferences, Room,
    Service, ServiceRequest, UserProfile,
};
use chrono::NaiveDate;
use lodge_core::ids::{BookingId, RoomId, ServiceId, UserId};
use lodge_core::{
    Department, HousekeepingStatus, MaintenancePriority, MaintenanceStatus, PaymentStatus, Role,
    RoomStatus, RoomType, ServiceRequestStatus, TaskKind, UserStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Strips surrounding whitespace before `validator` sees the value, so a
/// blank string fails its length rule.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|value| value.map(|value| value.trim().to_string()))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub durable: bool,
}

// auth

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Defaults to `guest`.
    pub role: Option<Role>,
    /// Required for staff.
    pub department: Option<Department>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email is invalid"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
    /// Client route for this user's dashboard, e.g. `/staff/housekeeping`.
    pub dashboard: String,
}

// rooms

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RoomCreateRequest {
    #[validate(length(min = 1, max = 16, message = "room_number is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub floor: i32,
    pub price: Decimal,
    #[validate(range(min = 1, message = "beds must be at least 1"))]
    pub beds: i32,
    /// Defaults to `available`.
    pub status: Option<RoomStatus>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct RoomUpdateRequest {
    #[validate(length(min = 1, max = 16, message = "room_number must not be empty"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub room_number: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,
    pub floor: Option<i32>,
    pub price: Option<Decimal>,
    #[validate(range(min = 1, message = "beds must be at least 1"))]
    pub beds: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RoomStatusRequest {
    pub status: RoomStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomListResponse {
    pub items: Vec<Room>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub room_type: Option<RoomType>,
}

// reservations

fn default_guests() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct BookingCreateRequest {
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    #[validate(range(min = 1, message = "guests must be at least 1"))]
    pub guests: u32,
    pub special_requests: Option<String>,
    /// Staff and admins book on behalf of this guest; ignored for guests.
    pub guest_id: Option<UserId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingListResponse {
    pub items: Vec<Booking>,
}

// invoices

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy)]
pub struct InvoiceServiceItem {
    pub service_id: ServiceId,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct InvoiceCreateRequest {
    pub booking_id: BookingId,
    /// Services to bill. When omitted, the booking's completed service
    /// requests are billed once each.
    pub services: Option<Vec<InvoiceServiceItem>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct PaymentUpdateRequest {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceListResponse {
    pub items: Vec<Invoice>,
}

// housekeeping and maintenance

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct TaskCreateRequest {
    pub room_id: RoomId,
    /// Defaults to `cleaning`.
    pub kind: Option<TaskKind>,
    pub assigned_to: Option<UserId>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// `assigned_to: null` clears the assignee.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct AssignRequest {
    pub assigned_to: Option<UserId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct TaskStatusRequest {
    pub status: HousekeepingStatus,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub items: Vec<HousekeepingTask>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct MaintenanceCreateRequest {
    pub room_id: RoomId,
    #[validate(length(min = 1, max = 2000, message = "issue is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub issue: String,
    /// Defaults to `medium`.
    pub priority: Option<MaintenancePriority>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct MaintenanceStatusRequest {
    pub status: MaintenanceStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceListResponse {
    pub items: Vec<MaintenanceRequest>,
}

// service catalog

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct ServiceCreateRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60, message = "category is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub category: String,
    pub price: Decimal,
    /// Defaults to `true`.
    pub available: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct ServiceUpdateRequest {
    #[validate(length(min = 1, max = 120, message = "name must not be empty"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60, message = "category must not be empty"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceListResponse {
    pub items: Vec<Service>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct ServiceRequestCreateRequest {
    pub service_id: ServiceId,
    pub booking_id: BookingId,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct ServiceRequestStatusRequest {
    pub status: ServiceRequestStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceRequestListResponse {
    pub items: Vec<ServiceRequest>,
}

// users

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserProfile>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserAdminUpdateRequest {
    pub role: Option<Role>,
    pub department: Option<Department>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 120, message = "name must not be empty"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "new_password must be at least 6 characters"))]
    pub new_password: String,
}

// settings

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct SettingsUpdateRequest {
    #[validate(length(min = 1, max = 120, message = "hotel_name must not be empty"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub hotel_name: Option<String>,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub tax_rate: Option<Decimal>,
    /// `HH:MM`.
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}
