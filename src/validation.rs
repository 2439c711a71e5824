use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FieldError, KanbanError};

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,4}$").unwrap_or_else(|e| panic!("email pattern: {e}"))
    })
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), KanbanError> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            errors.push(field("name", "Please enter your name"));
        } else if name_len < 2 {
            errors.push(field("name", "name must be at least 2 characters"));
        } else if name_len > 25 {
            errors.push(field("name", "name must be at most 25 characters"));
        }

        check_email(&self.email, &mut errors);

        if self.password.is_empty() {
            errors.push(field("password", "Please enter your password"));
        } else if self.password.chars().count() < 6 {
            errors.push(field("password", "password must be at least 6 characters"));
        }

        if self.confirm_password.is_empty() {
            errors.push(field("confirm_password", "confirm_password is a required field"));
        } else if self.confirm_password != self.password {
            errors.push(field("confirm_password", "Password must match"));
        }

        finish(errors)
    }
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), KanbanError> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(field("password", "Please enter your password"));
        }
        finish(errors)
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(field("email", "Please enter your email"));
    } else if !email_pattern().is_match(email) {
        errors.push(field("email", "Enter a valid email"));
    }
}

fn field(field: &'static str, message: &str) -> FieldError {
    FieldError {
        field,
        message: message.to_string(),
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), KanbanError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(KanbanError::invalid_form(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignUpForm {
        SignUpForm {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    fn fields(err: KanbanError) -> Vec<&'static str> {
        err.fields.iter().map(|f| f.field).collect()
    }

    #[test]
    fn accepts_valid_signup() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let form = SignUpForm {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            confirm_password: "456".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
        assert_eq!(fields(err), vec!["name", "email", "password", "confirm_password"]);
    }

    #[test]
    fn name_length_bounds() {
        let mut form = valid_signup();
        form.name = "x".repeat(26);
        assert_eq!(fields(form.validate().unwrap_err()), vec!["name"]);
        form.name = "xy".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn password_mismatch_message() {
        let mut form = valid_signup();
        form.confirm_password = "different".into();
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields[0].message, "Password must match");
    }

    #[test]
    fn login_requires_email_and_password() {
        let err = LoginForm::default().validate().unwrap_err();
        assert_eq!(fields(err), vec!["email", "password"]);
        let ok = LoginForm {
            email: "a.b-c@mail.example.org".into(),
            password: "x".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
