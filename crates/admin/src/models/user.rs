//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Email, UserId, UserRole};

/// A user account as listed by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `"First Last"`, or just the first name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }

    /// Uppercase initials for the avatar placeholder.
    #[must_use]
    pub fn initials(&self) -> String {
        [Some(self.first_name.as_str()), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Body of `POST /users` and `PATCH /users/{id}`.
///
/// `password` is omitted from the JSON when `None`, which is how an edit
/// keeps the current password. `Debug` redacts it.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
}

impl std::fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPayload")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("is_verified", &self.is_verified)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_with_underscore_id() {
        let user: User = serde_json::from_value(json!({
            "_id": "65f0c1",
            "firstName": "Ada",
            "email": "ada@example.com",
            "role": "admin",
            "isVerified": true,
            "createdAt": "2026-02-08T11:24:07.078Z"
        }))
        .unwrap();

        assert_eq!(user.id.as_str(), "65f0c1");
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.full_name(), "Ada");
        assert_eq!(user.initials(), "A");
    }

    #[test]
    fn test_legacy_role_and_defaults() {
        let user: User = serde_json::from_value(json!({
            "id": "u2",
            "firstName": "grace",
            "lastName": "hopper",
            "email": "grace@example.com",
            "role": "user",
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_verified);
        assert_eq!(user.full_name(), "grace hopper");
        assert_eq!(user.initials(), "GH");
    }

    #[test]
    fn test_payload_omits_blank_password_and_redacts_debug() {
        let payload = UserPayload {
            first_name: "Ada".to_string(),
            last_name: None,
            email: Email::parse("ada@example.com").unwrap(),
            password: None,
            role: UserRole::Staff,
            is_verified: false,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "firstName": "Ada",
                "email": "ada@example.com",
                "role": "staff",
                "isVerified": false
            })
        );

        let with_password = UserPayload {
            password: Some("hunter22".to_string()),
            ..payload
        };
        assert!(!format!("{with_password:?}").contains("hunter22"));
        assert_eq!(
            serde_json::to_value(&with_password).unwrap()["password"],
            "hunter22"
        );
    }
}
