//! Form validation primitives shared by every form.
//!
//! Validators are plain functions over the submitted values. They never touch the
//! request or the database; uniqueness rules are layered on by the handlers.

use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered list of rule violations for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }

    /// Record `message` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_valid() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trimmed, lower-cased form of a submitted email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub const PASSWORD_MIN_LEN: usize = 12;

pub const PASSWORD_POLICY_MESSAGE: &str =
    "Password must contain at least 1 capital letter, 1 number, and 1 special character.";

/// Check the account password policy: at least 12 characters with a digit, a
/// lowercase letter, an uppercase letter and a non-alphanumeric character, and
/// no whitespace anywhere.
pub fn check_password(errors: &mut FieldErrors, field: &'static str, password: &str) {
    if password.is_empty() {
        errors.add(field, "Password is required.");
        return;
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.add(field, "Password must be at least 12 characters.");
    }
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    let has_space = password.chars().any(char::is_whitespace);
    if !(has_digit && has_lower && has_upper && has_special) || has_space {
        errors.add(field, PASSWORD_POLICY_MESSAGE);
    }
}

/// Positive integer id from a path segment or hidden form field.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok().filter(|id: &i32| *id > 0)
}
