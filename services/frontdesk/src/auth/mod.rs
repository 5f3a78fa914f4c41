//! Front-desk authentication.
//!
//! # Purpose
//! Password hashing, EdDSA session tokens and the per-request guards that
//! turn a bearer header into a [`principal::Principal`].
pub mod guard;
pub mod keys;
pub mod password;
pub mod principal;
pub mod token;
