use serde::Deserialize;

/// Login form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub account_email: String,
    pub account_password: String,
}

/// Registration form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_password: String,
}

/// Profile update form body. The target account always comes from the session.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAccountForm {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
}

/// Password change form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordForm {
    pub account_password: String,
}
