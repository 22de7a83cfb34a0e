//! Food-services (mess) data transfer types.
//!
//! These mirror the backend's JSON shapes exactly: camelCase field names,
//! plan fees as plain numbers and months as `yyyy-MM-dd` dates pinned to
//! the first of the month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ===== Vendors =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub vendor_id: i64,
    pub vendor_name: String,
}

/// Body for vendor create and update; both take only the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorInput {
    pub vendor_name: String,
}

// ===== Vendor plans =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlan {
    pub vendor_plan_id: i64,
    pub plan_name: String,
    pub vendor_id: i64,
    pub fee: f64,
    #[serde(default)]
    pub meal_types: Vec<String>,
}

/// Listing entry from `vendorPlan/fetchAll`, carrying the vendor's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanSummary {
    pub vendor_plan_id: i64,
    pub plan_name: String,
    pub vendor_name: String,
    pub fee: f64,
    #[serde(default)]
    pub meal_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanCreate {
    pub plan_name: String,
    pub vendor_id: i64,
    pub fee: f64,
    pub meal_types: Vec<String>,
}

/// Update body for plans. Absent fields are left out of the JSON so the
/// same type serves the partial-update endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
}

// ===== Plan selections =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanSelectionCreate {
    pub vendor_plan_id: i64,
    pub user_id: i64,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub selected_month: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanSelection {
    pub vendor_plan_selection_id: i64,
    pub user_id: i64,
    pub vendor_plan_id: i64,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub selected_month: NaiveDate,
}

/// What a student sees for their own month: plan, vendor, meals and fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanSelectionSummary {
    pub vendor_plan_name: String,
    pub vendor_name: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub selected_month: NaiveDate,
    #[serde(default)]
    pub meal_types: Vec<String>,
    pub fee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VendorPlanSelectionUpdate {
    pub vendor_plan_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_month_serializes_as_date() {
        let body = VendorPlanSelectionCreate {
            vendor_plan_id: 3,
            user_id: 1,
            selected_month: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["selectedMonth"], "2025-06-01");
        assert_eq!(json["vendorPlanId"], 3);
    }

    #[test]
    fn test_partial_plan_update_skips_absent_fields() {
        let update = VendorPlanUpdate {
            fee: Some(2400.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"fee":2400.0}"#);
    }

    #[test]
    fn test_parse_selection_summary() {
        let json = r#"{"vendorPlanName": "Veg Full Board", "vendorName": "Annapurna Caterers", "selectedMonth": "2025-06-01", "mealTypes": ["BREAKFAST", "LUNCH", "DINNER"], "fee": 3200}"#;
        let summary: VendorPlanSelectionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.vendor_name, "Annapurna Caterers");
        assert_eq!(summary.meal_types.len(), 3);
        assert_eq!(summary.fee, 3200.0);
    }
}
