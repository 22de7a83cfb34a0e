//! Core library for the campus portal client.
//!
//! - [`api`]: the authenticated `ApiClient` (token attachment, rotation,
//!   refresh-once on 401) and typed wrappers for user, ticket and
//!   food-services endpoints
//! - [`auth`]: the `Session` owning persisted client state and its stores
//! - [`config`]: backend URL, endpoint paths and storage selection
//! - [`models`]: request and response types
//! - [`validation`]: sign-in / sign-up form rules

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError};
pub use auth::Session;
pub use config::Config;
