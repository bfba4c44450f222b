use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    pub price: Decimal,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    pub price: Decimal,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}
