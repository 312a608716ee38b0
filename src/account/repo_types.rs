use sqlx::FromRow;

use crate::auth::{AccountClaims, Role};

/// Account record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: i32,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_password: String, // argon2 PHC string
    pub account_type: Role,
}

impl Account {
    /// Session claims for this account. The password hash stays behind.
    pub fn into_claims(self) -> AccountClaims {
        AccountClaims {
            account_id: self.account_id,
            account_type: self.account_type,
            account_firstname: self.account_firstname,
            account_lastname: self.account_lastname,
            account_email: self.account_email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}
