//! Account roles, staff departments and the dashboard each one lands on.
use crate::{DomainError, DomainResult};

string_enum! {
    /// Coarse access level carried in every token.
    Role {
        Admin => "admin",
        Staff => "staff",
        Guest => "guest",
    }
}

string_enum! {
    /// Staff department. Only meaningful when the role is `staff`.
    Department {
        FrontOffice => "front-office",
        Housekeeping => "housekeeping",
        Maintenance => "maintenance",
        Management => "management",
    }
}

string_enum! {
    UserStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Deactivated => "deactivated",
    }
}

string_enum! {
    Theme {
        Light => "light",
        Dark => "dark",
    }
}

impl Role {
    /// Staff and admins run the hotel; guests only see their own records.
    pub fn is_staff_or_admin(self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Status a freshly registered account starts in.
    ///
    /// Guests can log in straight away. Staff wait for an admin to approve
    /// them. Admin accounts cannot be self-registered at all.
    pub fn registration_status(self) -> DomainResult<UserStatus> {
        match self {
            Role::Guest => Ok(UserStatus::Approved),
            Role::Staff => Ok(UserStatus::Pending),
            Role::Admin => Err(DomainError::Invalid(
                "admin accounts cannot be self-registered".to_string(),
            )),
        }
    }

    /// Normalizes the department for this role: staff must carry one,
    /// everyone else never does.
    pub fn department_for(self, department: Option<Department>) -> DomainResult<Option<Department>> {
        match (self, department) {
            (Role::Staff, Some(department)) => Ok(Some(department)),
            (Role::Staff, None) => Err(DomainError::Invalid(
                "staff accounts require a department".to_string(),
            )),
            (_, _) => Ok(None),
        }
    }
}

impl UserStatus {
    pub fn can_log_in(self) -> bool {
        self == UserStatus::Approved
    }
}

/// Client route a user is sent to after logging in.
pub fn dashboard_route(role: Role, department: Option<Department>) -> String {
    match (role, department) {
        (Role::Admin, _) => "/admin".to_string(),
        (Role::Guest, _) => "/guest".to_string(),
        (Role::Staff, Some(department)) => format!("/staff/{department}"),
        (Role::Staff, None) => "/staff".to_string(),
    }
}
