//! Authentication session types.
//!
//! The session is persisted as two storage entries: the bearer token under
//! `authToken` and the JSON-serialized [`SessionUser`] under `authUser`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use backoffice_core::{Email, UserId, UserRole};

/// Identity of the logged-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionUser {
    /// Name shown in the header.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ if !self.first_name.trim().is_empty() => self.first_name.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Snapshot of the authentication state.
///
/// `Debug` redacts the token.
#[derive(Clone, Default)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub token: Option<SecretString>,
}

impl Session {
    /// An authenticated session.
    #[must_use]
    pub const fn new(user: SessionUser, token: SecretString) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    /// Whether a bearer token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
            && self.token.as_ref().map(ExposeSecret::expose_secret)
                == other.token.as_ref().map(ExposeSecret::expose_secret)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("is_authenticated", &self.is_authenticated())
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: Email,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Response of `POST /auth/login`.
#[derive(Deserialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: SecretString,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn deserialize_secret<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_login_response_keeps_session_fields_only() {
        let response: LoginResponse = serde_json::from_value(json!({
            "user": {
                "_id": "u1",
                "email": "admin@example.com",
                "firstName": "Admin",
                "lastName": "User",
                "role": "admin",
                "isVerified": true
            },
            "token": "abc"
        }))
        .unwrap();

        assert_eq!(response.user.id.as_str(), "u1");
        assert_eq!(response.user.display_name(), "Admin User");
        assert_eq!(response.token.expose_secret(), "abc");
        assert!(!format!("{response:?}").contains("abc"));
    }

    #[test]
    fn test_session_authentication_and_debug() {
        assert!(!Session::default().is_authenticated());

        let user: SessionUser = serde_json::from_value(json!({
            "id": "u1",
            "email": "admin@example.com",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "admin@example.com");

        let session = Session::new(user, SecretString::from("abc"));
        assert!(session.is_authenticated());
        assert!(!format!("{session:?}").contains("abc"));
    }

    #[test]
    fn test_login_request_serializes_password() {
        let request = LoginRequest {
            email: Email::parse("admin@example.com").unwrap(),
            password: SecretString::from("password"),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "email": "admin@example.com", "password": "password" })
        );
        assert!(!format!("{request:?}").contains("\"password\""));
    }
}
