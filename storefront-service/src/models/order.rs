//! Order models - order header, line items and their outward projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::account::{Account, AccountResponse};
use crate::models::product::Product;

/// Accepted payment method labels. Recorded on the order, never processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Paypal,
}

impl PaymentMethod {
    pub const ALL: &'static [PaymentMethod] =
        &[PaymentMethod::Cash, PaymentMethod::CreditCard, PaymentMethod::Paypal];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "credit_card" => Some(PaymentMethod::CreditCard),
            "paypal" => Some(PaymentMethod::Paypal),
            _ => None,
        }
    }
}

/// Payment status. First value is the initial status on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: &'static [PaymentStatus] =
        &[PaymentStatus::Pending, PaymentStatus::Paid, PaymentStatus::Refunded];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// Order status. First value is the initial status on creation.
///
/// Any value from the set may be applied from any prior status; no
/// transition graph is enforced (inherited behavior, see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: &'static [OrderStatus] = &[
        OrderStatus::Created,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(OrderStatus::Created),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            "returned" => Some(OrderStatus::Returned),
            _ => None,
        }
    }
}

/// Order header.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub account_id: Uuid,
    pub shipping_fee: Decimal,
    pub delivery_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    pub created_utc: DateTime<Utc>,
}

/// Line item. Keeps the back-reference to its order in storage; the outward
/// projection [`OrderItemResponse`] omits it to break the serialization cycle.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// A line item joined with its product, as loaded from the store.
#[derive(Debug, Clone)]
pub struct OrderItemDetail {
    pub item: OrderItem,
    pub product: Product,
}

/// An order loaded with its owning account and line items.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub account: Account,
    pub items: Vec<OrderItemDetail>,
}

impl OrderDetail {
    /// Outward projection: credential stripped, item back-references dropped.
    pub fn into_response(self) -> OrderResponse {
        OrderResponse {
            order_id: self.order.order_id,
            account: self.account.sanitized(),
            shipping_fee: self.order.shipping_fee,
            delivery_address: self.order.delivery_address,
            payment_method: self.order.payment_method,
            payment_status: self.order.payment_status,
            order_status: self.order.order_status,
            created_utc: self.order.created_utc,
            items: self
                .items
                .into_iter()
                .map(|d| OrderItemResponse {
                    product: d.product,
                    quantity: d.item.quantity,
                    unit_price: d.item.unit_price,
                })
                .collect(),
        }
    }
}

/// Order for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub account: AccountResponse,
    pub shipping_fee: Decimal,
    pub delivery_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    pub created_utc: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

/// Line item for API responses. No parent order reference.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product: Product,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_statuses_are_first_of_each_set() {
        assert_eq!(PaymentStatus::ALL[0], PaymentStatus::Pending);
        assert_eq!(OrderStatus::ALL[0], OrderStatus::Created);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(PaymentMethod::parse("bitcoin").is_none());
        assert!(PaymentStatus::parse("settled").is_none());
        assert!(OrderStatus::parse("lost").is_none());
    }

    #[test]
    fn parse_roundtrips_every_value() {
        for m in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::parse(m.as_str()), Some(*m));
        }
        for s in PaymentStatus::ALL {
            assert_eq!(PaymentStatus::parse(s.as_str()), Some(*s));
        }
        for s in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(*s));
        }
    }
}
