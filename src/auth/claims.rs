use serde::{Deserialize, Serialize};

/// Access tier of an account. Stored as the Postgres enum `account_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type")]
pub enum Role {
    Client,
    Employee,
    Admin,
}

impl Role {
    /// Employees and admins may manage classifications and inventory.
    pub fn can_manage_inventory(self) -> bool {
        matches!(self, Role::Employee | Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Employee => "Employee",
            Role::Admin => "Admin",
        }
    }
}

/// Account identity carried inside the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    pub account_id: i32,
    pub account_type: Role,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
}

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub account: AccountClaims,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}
