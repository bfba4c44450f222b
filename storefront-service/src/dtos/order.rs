use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Product;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Comma-separated product ids; repeats raise the quantity.
    #[validate(length(min = 1, message = "Product list is required"))]
    pub product_ids: String,

    #[validate(length(min = 1, message = "Delivery address is required"))]
    pub delivery_address: String,

    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub product_ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

/// Both fields optional; at least one must be present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    pub payment_status: Option<String>,
    pub order_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TotalSalesResponse {
    pub total_sales: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderCountsResponse {
    pub total: u64,
    pub delivered: u64,
}
