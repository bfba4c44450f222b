//! Account model - registered storefront users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::Client,
        }
    }
}

/// Account entity. The `password_hash` never crosses the service boundary;
/// responses go through [`AccountResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub password_hash: String,
    pub role: String,
    pub created_utc: DateTime<Utc>,
}

impl Account {
    /// Create a new client account with an already-hashed credential.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        address: String,
        password_hash: String,
    ) -> Self {
        Self {
            account_id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            phone,
            address,
            password_hash,
            role: Role::Client.as_str().to_string(),
            created_utc: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        Role::from_string(&self.role)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Convert to sanitized response (no credential field).
    pub fn sanitized(&self) -> AccountResponse {
        AccountResponse::from(self.clone())
    }
}

/// Account profile for API responses (without the credential).
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub created_utc: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            account_id: a.account_id,
            first_name: a.first_name,
            last_name: a.last_name,
            email: a.email,
            phone: a.phone,
            address: a.address,
            role: a.role,
            created_utc: a.created_utc,
        }
    }
}
