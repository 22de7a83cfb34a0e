//! Display formatting helpers shared by front ends.

pub mod format;

pub use format::{format_fee, format_meal_types, format_month, truncate_string};
