use super::dto::{ChangePasswordForm, LoginForm, RegisterForm, UpdateAccountForm};
use super::repo_types::ProfileUpdate;
use crate::validation::{check_password, is_valid_email, normalize_email, FieldErrors};

pub const EMAIL_REQUIRED: &str = "A valid email address is required.";
pub const EMAIL_EXISTS: &str = "Email exists. Please log in or use a different email.";

/// Registration input that passed every synchronous rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn validate_registration(form: &RegisterForm) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();
    let firstname = form.account_firstname.trim().to_string();
    let lastname = form.account_lastname.trim().to_string();
    let email = normalize_email(&form.account_email);

    errors.check(!firstname.is_empty(), "account_firstname", "First name is required.");
    errors.check(!lastname.is_empty(), "account_lastname", "Last name is required.");
    errors.check(is_valid_email(&email), "account_email", EMAIL_REQUIRED);
    check_password(&mut errors, "account_password", &form.account_password);

    errors.finish(Registration {
        firstname,
        lastname,
        email,
        password: form.account_password.clone(),
    })
}

pub fn validate_login(form: &LoginForm) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = normalize_email(&form.account_email);

    errors.check(is_valid_email(&email), "account_email", EMAIL_REQUIRED);
    errors.check(
        !form.account_password.is_empty(),
        "account_password",
        "Password field cannot be empty.",
    );

    errors.finish(Credentials {
        email,
        password: form.account_password.clone(),
    })
}

pub fn validate_profile(form: &UpdateAccountForm) -> Result<ProfileUpdate, FieldErrors> {
    let mut errors = FieldErrors::new();
    let firstname = form.account_firstname.trim().to_string();
    let lastname = form.account_lastname.trim().to_string();
    let email = normalize_email(&form.account_email);

    errors.check(!firstname.is_empty(), "account_firstname", "First name is required.");
    errors.check(
        lastname.chars().count() >= 2,
        "account_lastname",
        "Last name must be at least 2 characters.",
    );
    errors.check(is_valid_email(&email), "account_email", EMAIL_REQUIRED);

    errors.finish(ProfileUpdate {
        firstname,
        lastname,
        email,
    })
}

pub fn validate_new_password(form: &ChangePasswordForm) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    check_password(&mut errors, "account_password", &form.account_password);
    errors.finish(form.account_password.clone())
}
