//! The authenticated caller of a request.
use crate::model::User;
use lodge_core::ids::UserId;
use lodge_core::{Department, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
    pub department: Option<Department>,
}

impl Principal {
    /// Role and department come from the stored user, not from the token, so
    /// an admin's change takes effect on the caller's next request.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            department: user.department,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_staff_or_admin(&self) -> bool {
        self.role.is_staff_or_admin()
    }

    /// Staff and admins see every record; guests only their own.
    pub fn can_access(&self, owner: UserId) -> bool {
        self.is_staff_or_admin() || self.user_id == owner
    }

    /// Owner filter to apply to list queries: `None` for staff, the caller's
    /// own id for guests.
    pub fn scope(&self) -> Option<UserId> {
        if self.is_staff_or_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}
