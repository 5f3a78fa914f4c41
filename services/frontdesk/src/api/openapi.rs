//! OpenAPI schema aggregation for the front-desk API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document served
//! at `/openapi.json` and rendered by Swagger UI at `/docs`.
use crate::api::{
    auth, housekeeping, invoices, maintenance, reports, reservations, rooms, service_requests,
    services, settings, system,
    types::{
        AssignRequest, AuthResponse, BookingCreateRequest, BookingListResponse, ErrorResponse,
        HealthStatus, InvoiceCreateRequest, InvoiceListResponse, InvoiceServiceItem, LoginRequest,
        MaintenanceCreateRequest, MaintenanceListResponse, MaintenanceStatusRequest,
        PasswordChangeRequest, PaymentUpdateRequest, ProfileUpdateRequest, RegisterRequest,
        RoomCreateRequest, RoomListResponse, RoomStatusRequest, RoomUpdateRequest,
        ServiceCreateRequest, ServiceListResponse, ServiceRequestCreateRequest,
        ServiceRequestListResponse, ServiceRequestStatusRequest, ServiceUpdateRequest,
        SettingsUpdateRequest, TaskCreateRequest, TaskListResponse, TaskStatusRequest,
        UserAdminUpdateRequest, UserListResponse,
    },
    users,
};
use crate::model::{
    Booking, ContactInfo, HotelSettings, HousekeepingTask, Invoice, MaintenanceRequest,
    Preferences, Room, Service, ServiceRequest, UserProfile,
};
use lodge_core::{
    BookingStatus, BookingStatusTally, Department, HousekeepingStatus, LineItem,
    MaintenancePriority, MaintenanceStatus, Overview, PaymentStatus, Role, RoomStatus,
    RoomStatusTally, RoomType, ServiceRequestStatus, TaskKind, Theme, UserStatus,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer` scheme every protected path refers to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lodge-frontdesk",
        version = "v1",
        description = "Lodge hotel operations HTTP API"
    ),
    modifiers(&BearerAuth),
    paths(
        system::health,
        auth::register,
        auth::login,
        rooms::list_rooms,
        rooms::available_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::set_room_status,
        rooms::delete_room,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::check_in,
        reservations::check_out,
        reservations::cancel,
        reservations::delete_reservation,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::create_invoice,
        invoices::update_payment,
        invoices::delete_invoice,
        housekeeping::list_tasks,
        housekeeping::create_task,
        housekeeping::assign_task,
        housekeeping::update_task_status,
        housekeeping::delete_task,
        maintenance::list_requests,
        maintenance::report_issue,
        maintenance::assign_request,
        maintenance::update_request_status,
        maintenance::delete_request,
        services::list_services,
        services::create_service,
        services::update_service,
        services::delete_service,
        service_requests::list_service_requests,
        service_requests::create_service_request,
        service_requests::update_service_request_status,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::get_me,
        users::update_me,
        users::change_password,
        users::upload_photo,
        reports::overview,
        settings::get_settings,
        settings::update_settings
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserProfile,
        ContactInfo,
        Preferences,
        Role,
        Department,
        UserStatus,
        Theme,
        Room,
        RoomType,
        RoomStatus,
        RoomCreateRequest,
        RoomUpdateRequest,
        RoomStatusRequest,
        RoomListResponse,
        Booking,
        BookingStatus,
        BookingCreateRequest,
        BookingListResponse,
        Invoice,
        LineItem,
        PaymentStatus,
        InvoiceServiceItem,
        InvoiceCreateRequest,
        PaymentUpdateRequest,
        InvoiceListResponse,
        HousekeepingTask,
        HousekeepingStatus,
        TaskKind,
        TaskCreateRequest,
        TaskStatusRequest,
        TaskListResponse,
        AssignRequest,
        MaintenanceRequest,
        MaintenanceStatus,
        MaintenancePriority,
        MaintenanceCreateRequest,
        MaintenanceStatusRequest,
        MaintenanceListResponse,
        Service,
        ServiceCreateRequest,
        ServiceUpdateRequest,
        ServiceListResponse,
        ServiceRequest,
        ServiceRequestStatus,
        ServiceRequestCreateRequest,
        ServiceRequestStatusRequest,
        ServiceRequestListResponse,
        UserListResponse,
        UserAdminUpdateRequest,
        ProfileUpdateRequest,
        PasswordChangeRequest,
        Overview,
        RoomStatusTally,
        BookingStatusTally,
        HotelSettings,
        SettingsUpdateRequest
    )),
    tags(
        (name = "system", description = "Health"),
        (name = "auth", description = "Registration and login"),
        (name = "rooms", description = "Room inventory and availability"),
        (name = "reservations", description = "Booking lifecycle"),
        (name = "invoices", description = "Billing"),
        (name = "housekeeping", description = "Cleaning and turnover tasks"),
        (name = "maintenance", description = "Room issues"),
        (name = "services", description = "Guest service catalog"),
        (name = "service-requests", description = "Guest service requests"),
        (name = "users", description = "Accounts and profiles"),
        (name = "reports", description = "Dashboard figures"),
        (name = "settings", description = "Hotel settings")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serialize openapi");
        let paths = json["paths"].as_object().expect("paths");
        assert!(paths.contains_key("/reservations/{booking_id}/checkin"));
        assert!(paths.contains_key("/users/me/photo"));
        assert!(paths.contains_key("/reports/overview"));
        assert_eq!(
            json["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
    }
}
