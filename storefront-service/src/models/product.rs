//! Product model - catalog entries consumed by pricing and orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fixed category list exposed to clients.
pub const CATEGORIES: &[&str] = &[
    "Phones",
    "Computers",
    "Accessories",
    "Printers",
    "Cameras",
    "Other",
];

/// Catalog product. Read-only to the order pipeline; line items capture the
/// unit price at order time so later edits here do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    pub created_utc: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        brand: String,
        category: String,
        price: Decimal,
        description: String,
    ) -> Self {
        Self {
            product_id: Uuid::new_v4(),
            name,
            brand,
            category,
            price,
            description,
            created_utc: Utc::now(),
        }
    }
}

/// Sort column for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Id,
    Name,
    Brand,
    Category,
    Price,
    Date,
}

impl ProductSort {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "name" => ProductSort::Name,
            "brand" => ProductSort::Brand,
            "category" => ProductSort::Category,
            "price" => ProductSort::Price,
            "date" => ProductSort::Date,
            _ => ProductSort::Id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_string(s: &str) -> Self {
        match s {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Filter parameters for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
    pub order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}
