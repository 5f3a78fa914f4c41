//! Front-desk service library crate.
//!
//! # Purpose
//! Exposes the hotel operations API, auth helpers, configuration and storage
//! backends for use by the binary and the integration tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
