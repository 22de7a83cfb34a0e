//! Food-services (mess) endpoints: vendors, vendor plans and the monthly
//! plan selections students make.
//!
//! Admin endpoints live under `/mess/admin`; a student's own selections
//! under `/mess/vendorPlanSelection`. Delete endpoints answer with a plain
//! text message, which is returned as is.

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::{
    Vendor, VendorInput, VendorPlan, VendorPlanCreate, VendorPlanSelection,
    VendorPlanSelectionCreate, VendorPlanSelectionSummary, VendorPlanSelectionUpdate,
    VendorPlanSummary, VendorPlanUpdate,
};

use super::ApiClient;

const ADMIN_VENDOR: &str = "/mess/admin/vendor";
const ADMIN_VENDOR_PLAN: &str = "/mess/admin/vendorPlan";
const ADMIN_SELECTION: &str = "/mess/admin/vendorPlanSelection";
const USER_SELECTION: &str = "/mess/vendorPlanSelection";

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// First day of the named month, the date format plan selections use.
///
/// Month names are English and case-insensitive; three-letter
/// abbreviations are accepted.
pub fn selection_month(month_name: &str, year: i32) -> Result<NaiveDate> {
    let wanted = month_name.trim().to_lowercase();
    let index = MONTH_NAMES
        .iter()
        .position(|m| *m == wanted || (wanted.len() == 3 && m.starts_with(&wanted)))
        .ok_or_else(|| anyhow::anyhow!("Unknown month: {}", month_name))?;

    NaiveDate::from_ymd_opt(year, index as u32 + 1, 1)
        .ok_or_else(|| anyhow::anyhow!("Invalid year for plan selection: {}", year))
}

/// Food-services calls, borrowed from an [`ApiClient`] via [`ApiClient::food`].
#[derive(Debug, Clone, Copy)]
pub struct FoodServices<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn food(&self) -> FoodServices<'_> {
        FoodServices { client: self }
    }
}

impl FoodServices<'_> {
    // ===== Admin: vendors =====

    pub async fn vendor(&self, id: i64) -> Result<Vendor> {
        self.client.get(&format!("{}/fetch/{}", ADMIN_VENDOR, id)).await
    }

    pub async fn vendors(&self) -> Result<Vec<Vendor>> {
        self.client.get(&format!("{}/fetchAll", ADMIN_VENDOR)).await
    }

    pub async fn create_vendor(&self, vendor: &VendorInput) -> Result<Vendor> {
        self.client.post(&format!("{}/create", ADMIN_VENDOR), vendor).await
    }

    pub async fn update_vendor(&self, id: i64, vendor: &VendorInput) -> Result<Vendor> {
        self.client.put(&format!("{}/update/{}", ADMIN_VENDOR, id), vendor).await
    }

    pub async fn delete_vendor(&self, id: i64) -> Result<String> {
        self.client.delete(&format!("{}/delete/{}", ADMIN_VENDOR, id)).await
    }

    // ===== Admin: vendor plans =====

    pub async fn vendor_plan(&self, id: i64) -> Result<VendorPlan> {
        self.client.get(&format!("{}/fetch/{}", ADMIN_VENDOR_PLAN, id)).await
    }

    pub async fn vendor_plans(&self) -> Result<Vec<VendorPlanSummary>> {
        self.client.get(&format!("{}/fetchAll", ADMIN_VENDOR_PLAN)).await
    }

    pub async fn create_vendor_plan(&self, plan: &VendorPlanCreate) -> Result<VendorPlan> {
        self.client.post(&format!("{}/create", ADMIN_VENDOR_PLAN), plan).await
    }

    pub async fn update_vendor_plan(&self, id: i64, update: &VendorPlanUpdate) -> Result<VendorPlan> {
        self.client
            .put(&format!("{}/update/{}", ADMIN_VENDOR_PLAN, id), update)
            .await
    }

    /// Only the fields set in `update` are sent.
    pub async fn partial_update_vendor_plan(&self, id: i64, update: &VendorPlanUpdate) -> Result<VendorPlan> {
        self.client
            .patch(&format!("{}/partialUpdate/{}", ADMIN_VENDOR_PLAN, id), update)
            .await
    }

    pub async fn delete_vendor_plan(&self, id: i64) -> Result<String> {
        self.client.delete(&format!("{}/delete/{}", ADMIN_VENDOR_PLAN, id)).await
    }

    // ===== Admin: selections on behalf of a user =====

    pub async fn admin_create_selection(&self, selection: &VendorPlanSelectionCreate) -> Result<VendorPlanSelection> {
        self.client.post(&format!("{}/create", ADMIN_SELECTION), selection).await
    }

    pub async fn admin_update_selection(
        &self,
        selection_id: i64,
        update: &VendorPlanSelectionUpdate,
    ) -> Result<VendorPlanSelection> {
        self.client
            .put(&format!("{}/update/{}", ADMIN_SELECTION, selection_id), update)
            .await
    }

    pub async fn admin_delete_selection(&self, selection_id: i64) -> Result<String> {
        self.client
            .delete(&format!("{}/delete/{}", ADMIN_SELECTION, selection_id))
            .await
    }

    // ===== Student: own selections =====

    pub async fn selection(&self, selection_id: i64) -> Result<VendorPlanSelection> {
        self.client
            .get(&format!("{}/fetch/{}", USER_SELECTION, selection_id))
            .await
    }

    pub async fn selection_for_user(&self, user_id: i64) -> Result<VendorPlanSelectionSummary> {
        self.client
            .get(&format!("{}/fetchByUser/{}", USER_SELECTION, user_id))
            .await
    }

    pub async fn create_selection(&self, selection: &VendorPlanSelectionCreate) -> Result<VendorPlanSelection> {
        self.client.post(&format!("{}/create", USER_SELECTION), selection).await
    }

    pub async fn update_selection(
        &self,
        selection_id: i64,
        update: &VendorPlanSelectionUpdate,
    ) -> Result<VendorPlanSelection> {
        self.client
            .put(&format!("{}/update/{}", USER_SELECTION, selection_id), update)
            .await
    }

    pub async fn delete_selection(&self, selection_id: i64) -> Result<String> {
        self.client
            .delete(&format!("{}/delete/{}", USER_SELECTION, selection_id))
            .await
    }
}
