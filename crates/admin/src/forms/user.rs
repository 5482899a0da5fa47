//! Create/edit user modal.

use async_trait::async_trait;

use backoffice_core::{UserId, UserRole};

use super::{FormMode, FormSchema, FormSpec};
use crate::error::AppError;
use crate::models::{User, UserPayload};
use crate::resources::AdminApi;
use crate::validation::{self, ValidationErrors};

/// User modal fields. `Debug` redacts the password.
#[derive(Clone)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Required on create. Left blank on edit to keep the current password.
    pub password: String,
    pub role: String,
    pub is_verified: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            role: UserRole::Customer.as_str().to_owned(),
            is_verified: false,
        }
    }
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("is_verified", &self.is_verified)
            .finish()
    }
}

impl FormSchema for UserForm {
    type Output = UserPayload;

    fn validate(&self, editing: bool) -> Result<UserPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first_name =
            validation::min_chars(&mut errors, "firstName", &self.first_name, 1, "First name is required");
        let email = validation::email(&mut errors, "email", &self.email);

        let password = if editing && self.password.is_empty() {
            None
        } else {
            if self.password.chars().count() < 6 {
                errors.add("password", "Password must be at least 6 characters");
            }
            Some(self.password.clone())
        };

        let role = match self.role.trim().parse::<UserRole>() {
            Ok(role) if role.is_assignable() => Some(role),
            _ => {
                errors.add("role", "Role must be admin, staff or customer");
                None
            }
        };

        match (email, role) {
            (Some(email), Some(role)) if errors.is_empty() => Ok(UserPayload {
                first_name,
                last_name: validation::optional_text(&self.last_name),
                email,
                password,
                role,
                is_verified: self.is_verified,
            }),
            _ => Err(errors),
        }
    }
}

#[async_trait]
impl FormSpec for UserForm {
    type Entity = User;
    type Id = UserId;
    const NOUN: &'static str = "user";

    fn from_entity(user: &User) -> Self {
        let role = if user.role.is_assignable() {
            user.role
        } else {
            UserRole::Customer
        };
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
            email: user.email.clone(),
            password: String::new(),
            role: role.as_str().to_owned(),
            is_verified: user.is_verified,
        }
    }

    async fn submit(
        api: &AdminApi,
        mode: &FormMode<UserId>,
        payload: &UserPayload,
    ) -> Result<(), AppError> {
        match mode {
            FormMode::Create => api.create_user(payload).await?,
            FormMode::Edit(id) => api.update_user(id, payload).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filled() -> UserForm {
        UserForm {
            first_name: "Jane".to_string(),
            last_name: " ".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
            role: "staff".to_string(),
            is_verified: true,
        }
    }

    #[test]
    fn test_password_required_on_create() {
        let form = UserForm {
            password: String::new(),
            ..filled()
        };
        let errors = form.validate(false).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_blank_password_omitted_on_edit() {
        let form = UserForm {
            password: String::new(),
            ..filled()
        };
        let payload = form.validate(true).unwrap();
        assert_eq!(payload.password, None);
        assert_eq!(payload.last_name, None);

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            body,
            json!({
                "firstName": "Jane",
                "email": "jane@example.com",
                "role": "staff",
                "isVerified": true
            })
        );
    }

    #[test]
    fn test_short_password_rejected_on_edit() {
        let form = UserForm {
            password: "abc".to_string(),
            ..filled()
        };
        assert!(form.validate(true).unwrap_err().get("password").is_some());
    }

    #[test]
    fn test_role_must_be_assignable() {
        let form = UserForm {
            role: "user".to_string(),
            ..filled()
        };
        assert!(form.validate(false).unwrap_err().get("role").is_some());
    }

    #[test]
    fn test_missing_first_name() {
        let form = UserForm {
            first_name: "   ".to_string(),
            ..filled()
        };
        assert_eq!(
            form.validate(false).unwrap_err().get("firstName"),
            Some("First name is required")
        );
    }

    #[test]
    fn test_messages() {
        let edit = FormMode::Edit(UserId::new("u1"));
        assert_eq!(UserForm::success_message(&edit), "User updated successfully");
        assert_eq!(UserForm::failure_message(&FormMode::Create), "Failed to create user");
    }
}
