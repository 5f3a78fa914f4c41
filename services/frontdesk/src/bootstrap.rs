//! First-run admin account.
//!
//! Admins cannot register over HTTP, so a fresh deployment gets its first
//! one from `FRONTDESK_ADMIN_EMAIL` / `FRONTDESK_ADMIN_PASSWORD`. Seeding is
//! idempotent: an existing account with that email is left untouched, even
//! when its role or password differ.
use crate::api::auth::normalize_email;
use crate::auth::password::hash_password_blocking;
use crate::config::AdminSeed;
use crate::model::{ContactInfo, Preferences, User};
use crate::store::{HotelStore, StoreError};
use anyhow::{Context, Result, bail};
use chrono::Utc;
use lodge_core::ids::UserId;
use lodge_core::{Role, UserStatus};

/// Outcome of [`seed_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(UserId),
    AlreadyPresent(UserId),
}

pub async fn seed_admin(store: &dyn HotelStore, seed: &AdminSeed) -> Result<SeedOutcome> {
    let email = normalize_email(&seed.email);
    if email.is_empty() || seed.password.is_empty() {
        bail!("admin seed needs a non-empty email and password");
    }
    if let Some(existing) = store
        .find_user_by_email(&email)
        .await
        .context("look up admin account")?
    {
        tracing::debug!(user_id = %existing.id, "admin seed already present");
        return Ok(SeedOutcome::AlreadyPresent(existing.id));
    }

    let password_hash = hash_password_blocking(seed.password.clone())
        .await
        .context("hash admin password")?;
    let now = Utc::now();
    let admin = User {
        id: UserId::new(),
        name: seed.name.trim().to_string(),
        email: email.clone(),
        password_hash,
        role: Role::Admin,
        department: None,
        status: UserStatus::Approved,
        preferences: Preferences::default(),
        contact: ContactInfo::default(),
        photo_url: None,
        created_at: now,
        updated_at: now,
    };
    match store.create_user(admin).await {
        Ok(created) => {
            tracing::info!(user_id = %created.id, email = %created.email, "admin account seeded");
            Ok(SeedOutcome::Created(created.id))
        }
        // Another replica seeded it between our lookup and insert.
        Err(StoreError::Conflict(_)) => {
            let existing = store
                .find_user_by_email(&email)
                .await
                .context("look up admin account")?
                .context("admin account vanished after conflict")?;
            Ok(SeedOutcome::AlreadyPresent(existing.id))
        }
        Err(err) => Err(err).context("create admin account"),
    }
}
