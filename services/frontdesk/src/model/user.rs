//! User accounts.
//!
//! `User` is the stored record and carries the password hash. Anything sent
//! back to a client goes through [`UserProfile`].
use chrono::{DateTime, Utc};
use lodge_core::ids::UserId;
use lodge_core::{Department, Role, Theme, UserStatus, dashboard_route};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub currency: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Always lower-cased.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub department: Option<Department>,
    pub status: UserStatus,
    pub preferences: Preferences,
    pub contact: ContactInfo,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn dashboard(&self) -> String {
        dashboard_route(self.role, self.department)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<Department>,
    pub status: UserStatus,
    pub preferences: Preferences,
    pub contact: ContactInfo,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            department: user.department,
            status: user.status,
            preferences: user.preferences.clone(),
            contact: user.contact.clone(),
            photo_url: user.photo_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
