//! Login form.

use secrecy::SecretString;

use super::FormSchema;
use crate::models::LoginRequest;
use crate::validation::{self, ValidationErrors};

/// Email and password as typed. `Debug` redacts the password.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl FormSchema for LoginForm {
    type Output = LoginRequest;

    fn validate(&self, _editing: bool) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = validation::email(&mut errors, "email", &self.email);
        if self.password.chars().count() < 6 {
            errors.add("password", "Password must be at least 6 characters");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(LoginRequest {
                email,
                password: SecretString::from(self.password.clone()),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_valid_login() {
        let form = LoginForm {
            email: " admin@example.com ".to_string(),
            password: "password".to_string(),
        };
        let request = form.validate(false).unwrap();
        assert_eq!(request.email.as_str(), "admin@example.com");
        assert_eq!(request.password.expose_secret(), "password");
    }

    #[test]
    fn test_invalid_login_reports_both_fields() {
        let form = LoginForm {
            email: "admin".to_string(),
            password: "12345".to_string(),
        };
        let errors = form.validate(false).unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert!(!format!("{form:?}").contains("12345"));
    }
}
