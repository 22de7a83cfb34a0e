//! User, profile and ticket endpoints.

use anyhow::Result;
use serde_json::Value;

use crate::models::{NewTicket, ProfileUpdate, UserProfile};
use crate::validation::is_valid_email;

use super::ApiClient;

impl ApiClient {
    /// Fetch the user the current token belongs to
    pub async fn who_am_i(&self) -> Result<UserProfile> {
        self.get("/user/whoAmI").await
    }

    /// Look a user up by email address
    pub async fn user_by_email(&self, email: &str) -> Result<UserProfile> {
        let email = email.trim();
        if !is_valid_email(email) {
            anyhow::bail!("Not a valid email address: {}", email);
        }
        self.get(&format!("/user/fetchByEmail/{}", email)).await
    }

    pub async fn get_profile(&self) -> Result<Value> {
        self.get("/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Value> {
        self.put("/profile", update).await
    }

    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Value> {
        self.post("/tickets", ticket).await
    }

    pub async fn delete_ticket(&self, ticket_id: &str) -> Result<Value> {
        self.delete(&format!("/tickets/{}", ticket_id)).await
    }
}
