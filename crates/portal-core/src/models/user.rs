use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A role assigned to a portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub role_name: String,
}

/// The signed-in user as returned by `/user/whoAmI`.
///
/// Only the fields the client reads are typed; everything else the backend
/// sends is kept in `extra` so the stored profile round-trips intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub user_roles: Vec<UserRole>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn role_names(&self) -> Vec<String> {
        self.user_roles.iter().map(|r| r.role_name.clone()).collect()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user_roles
            .iter()
            .any(|r| r.role_name.eq_ignore_ascii_case(role))
    }

    /// Name for display, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unknown user")
    }
}

/// Body for `PUT /profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_who_am_i() {
        let json = r#"{"userId": 42, "email": "asha@campus.edu", "name": "Asha Rao", "userRoles": [{"roleId": 1, "roleName": "STUDENT"}, {"roleId": 7, "roleName": "MESS_ADMIN"}]}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(user.email.as_deref(), Some("asha@campus.edu"));
        assert_eq!(user.role_names(), vec!["STUDENT", "MESS_ADMIN"]);
        assert!(user.has_role("mess_admin"));
        assert_eq!(user.extra.get("userId"), Some(&Value::from(42)));

        // Unknown fields survive a round trip
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["userId"], 42);
    }

    #[test]
    fn test_display_name_fallback() {
        let user = UserProfile {
            email: Some("x@campus.edu".to_string()),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "x@campus.edu");
        assert_eq!(UserProfile::default().display_name(), "Unknown user");
    }
}
