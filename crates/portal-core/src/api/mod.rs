//! REST API client module for the campus portal backend.
//!
//! This module provides the `ApiClient` for talking to the portal's REST
//! API: user lookup, profile and tickets, and food services.
//!
//! The API uses bearer token authentication. Tokens are refreshed through
//! the backend's refresh endpoint when a request comes back 401.

pub mod account;
pub mod client;
pub mod error;
pub mod food;

pub use client::{ApiClient, LoginRedirect, PendingRequest, ResponseBody};
pub use error::{api_error, ApiError};
pub use food::{selection_month, FoodServices};
