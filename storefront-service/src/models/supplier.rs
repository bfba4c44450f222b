//! Supplier model - admin-managed vendor directory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Supplier entity. Email is unique at the store layer.
#[derive(Debug, Clone, FromRow)]
pub struct Supplier {
    pub supplier_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_utc: DateTime<Utc>,
}

impl Supplier {
    pub fn new(name: String, email: String, phone: String, address: String) -> Self {
        Self {
            supplier_id: Uuid::new_v4(),
            name,
            email,
            phone,
            address,
            created_utc: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierResponse {
    pub supplier_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_utc: DateTime<Utc>,
}

impl From<Supplier> for SupplierResponse {
    fn from(s: Supplier) -> Self {
        Self {
            supplier_id: s.supplier_id,
            name: s.name,
            email: s.email,
            phone: s.phone,
            address: s.address,
            created_utc: s.created_utc,
        }
    }
}
