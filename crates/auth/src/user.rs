//! User record as returned by the backend at login.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use printshop_core::UserId;

use crate::Role;

/// Signed-in user.
///
/// Only `id` and `role` are required. Profile fields the client does not
/// interpret (phone, avatar, address, ...) are kept in `profile` so the
/// record survives a store/load cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            profile: Map::new(),
        }
    }

    /// Name shown in headers and menus; falls back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_profile_fields_survive_round_trip() {
        let raw = json!({
            "id": "64f0c1",
            "name": "Ama Mensah",
            "email": "ama@example.com",
            "role": "Order_Manager",
            "phone": "+233 20 000 0000",
            "branch": { "city": "Kumasi" }
        });

        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.role, Role::OrderManager);
        assert_eq!(user.profile.get("phone"), Some(&json!("+233 20 000 0000")));

        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let raw = json!({ "id": "1", "name": "X", "email": "x@example.com", "role": "Janitor" });
        assert!(serde_json::from_value::<User>(raw).is_err());
    }

    #[test]
    fn missing_role_is_rejected() {
        let raw = json!({ "id": "1", "name": "X", "email": "x@example.com" });
        assert!(serde_json::from_value::<User>(raw).is_err());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let id = UserId::new("7").unwrap();
        let user = User::new(id, "  ", "kofi@example.com", Role::Staff);
        assert_eq!(user.display_name(), "kofi@example.com");
    }
}
