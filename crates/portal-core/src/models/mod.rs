//! Data models for portal entities.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `UserProfile`, `UserRole`: the signed-in user and their roles
//! - Food-services types: vendors, vendor plans and monthly plan selections
//! - `NewTicket`, `ProfileUpdate`: request bodies for tickets and profile edits

pub mod food;
pub mod ticket;
pub mod user;

pub use food::{
    Vendor, VendorInput, VendorPlan, VendorPlanCreate, VendorPlanSelection,
    VendorPlanSelectionCreate, VendorPlanSelectionSummary, VendorPlanSelectionUpdate,
    VendorPlanSummary, VendorPlanUpdate,
};
pub use ticket::NewTicket;
pub use user::{ProfileUpdate, UserProfile, UserRole};
