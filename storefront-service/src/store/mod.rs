//! Persistence seam. Services depend on the [`Store`] trait only; the
//! concrete backends live in [`postgres`] and [`memory`].

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Account, Order, OrderDetail, OrderItem, Product, ProductFilter, ResetToken, Role, Supplier,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated; the payload names the column.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// CRUD and query access over accounts, reset tokens, products, orders and
/// suppliers. Multi-row writes (order + line items, reset-token replacement)
/// are atomic per call.
///
/// Listing methods take a 1-based page and return `(rows, total_count)` read
/// within the same request so page math stays consistent.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Accounts
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_account_by_id(&self, account_id: Uuid) -> Result<Option<Account>, StoreError>;
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;
    async fn list_accounts(
        &self,
        role: Option<Role>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Account>, u64), StoreError>;
    async fn count_accounts(&self, role: Option<Role>) -> Result<u64, StoreError>;

    // Reset tokens
    /// Delete any live token for the email and insert the new one, atomically.
    async fn replace_reset_token(&self, token: &ResetToken) -> Result<(), StoreError>;
    async fn find_reset_token(&self, token: &str) -> Result<Option<ResetToken>, StoreError>;
    async fn delete_reset_token(&self, token: &str) -> Result<(), StoreError>;

    // Products
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;
    async fn update_product(&self, product: &Product) -> Result<bool, StoreError>;
    async fn delete_product(&self, product_id: Uuid) -> Result<bool, StoreError>;
    async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, u64), StoreError>;
    async fn recent_products(&self, limit: u32) -> Result<Vec<Product>, StoreError>;
    async fn count_products_by_category(&self) -> Result<Vec<(String, u64)>, StoreError>;

    // Orders
    /// Insert the header and all line items in one transaction.
    async fn insert_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError>;
    /// Load an order with account and line items. When `owner` is given the
    /// lookup is scoped to that account, so a foreign order reads as absent.
    async fn find_order(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<Option<OrderDetail>, StoreError>;
    async fn find_order_header(&self, order_id: Uuid) -> Result<Option<Order>, StoreError>;
    async fn update_order(&self, order: &Order) -> Result<(), StoreError>;
    /// Hard delete; line items cascade.
    async fn delete_order(&self, order_id: Uuid) -> Result<bool, StoreError>;
    /// Newest-first, optionally scoped to one account.
    async fn list_orders(
        &self,
        owner: Option<Uuid>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<OrderDetail>, u64), StoreError>;
    /// Single-pass aggregate over all orders and their line items.
    async fn total_sales(&self) -> Result<Decimal, StoreError>;
    async fn count_orders(&self) -> Result<u64, StoreError>;
    async fn count_orders_with_status(&self, order_status: &str) -> Result<u64, StoreError>;

    // Suppliers
    async fn insert_supplier(&self, supplier: &Supplier) -> Result<(), StoreError>;
    async fn update_supplier(&self, supplier: &Supplier) -> Result<bool, StoreError>;
    async fn delete_supplier(&self, supplier_id: Uuid) -> Result<bool, StoreError>;
    async fn find_supplier(&self, supplier_id: Uuid) -> Result<Option<Supplier>, StoreError>;
    /// Newest-first.
    async fn list_suppliers(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Supplier>, u64), StoreError>;
}
