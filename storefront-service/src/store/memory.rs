//! In-memory implementation of the [`Store`] trait, used by unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    Account, Order, OrderDetail, OrderItem, OrderItemDetail, Product, ProductFilter, ProductSort,
    ResetToken, Role, SortOrder, Supplier,
};
use crate::store::{Store, StoreError};

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    reset_tokens: Vec<ResetToken>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    suppliers: Vec<Supplier>,
}

/// Store backed by in-process tables behind a single lock. Mirrors the
/// PostgreSQL backend's semantics: unique emails, cascading line-item
/// deletes, newest-first listings.
#[derive(Default)]
pub struct MemStore {
    tables: Mutex<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(rows: &[T], page: u32, page_size: u32) -> Vec<T> {
    let offset = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    rows.iter()
        .skip(offset)
        .take(page_size as usize)
        .cloned()
        .collect()
}

impl Tables {
    fn detail(&self, order: &Order) -> Result<OrderDetail, StoreError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.account_id == order.account_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Other(anyhow::anyhow!(
                    "Order references missing account {}",
                    order.account_id
                ))
            })?;

        let mut items = Vec::new();
        for item in self.order_items.iter().filter(|i| i.order_id == order.order_id) {
            let product = self
                .products
                .iter()
                .find(|p| p.product_id == item.product_id)
                .cloned()
                .ok_or_else(|| {
                    StoreError::Other(anyhow::anyhow!(
                        "Line item references missing product {}",
                        item.product_id
                    ))
                })?;
            items.push(OrderItemDetail {
                item: item.clone(),
                product,
            });
        }

        Ok(OrderDetail {
            order: order.clone(),
            account,
            items,
        })
    }
}

#[async_trait]
impl Store for MemStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::UniqueViolation("email"));
        }
        tables.accounts.push(account.clone());
        Ok(())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.account_id == account_id)
            .cloned())
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .accounts
            .iter()
            .any(|a| a.email == account.email && a.account_id != account.account_id)
        {
            return Err(StoreError::UniqueViolation("email"));
        }
        if let Some(existing) = tables
            .accounts
            .iter_mut()
            .find(|a| a.account_id == account.account_id)
        {
            *existing = account.clone();
        }
        Ok(())
    }

    async fn list_accounts(
        &self,
        role: Option<Role>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Account>, u64), StoreError> {
        let tables = self.tables.lock().await;
        let mut matched: Vec<Account> = tables
            .accounts
            .iter()
            .filter(|a| role.map_or(true, |r| a.role == r.as_str()))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
        let total = matched.len() as u64;
        Ok((paginate(&matched, page, page_size), total))
    }

    async fn count_accounts(&self, role: Option<Role>) -> Result<u64, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|a| role.map_or(true, |r| a.role == r.as_str()))
            .count() as u64)
    }

    // -------------------------------------------------------------------------
    // Reset tokens
    // -------------------------------------------------------------------------

    async fn replace_reset_token(&self, token: &ResetToken) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.reset_tokens.retain(|t| t.email != token.email);
        tables.reset_tokens.push(token.clone());
        Ok(())
    }

    async fn find_reset_token(&self, token: &str) -> Result<Option<ResetToken>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .reset_tokens
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn delete_reset_token(&self, token: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.reset_tokens.retain(|t| t.token != token);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.products.push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables
            .products
            .iter_mut()
            .find(|p| p.product_id == product.product_id)
        {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, product_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.product_id != product_id);
        Ok(tables.products.len() < before)
    }

    async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, u64), StoreError> {
        let tables = self.tables.lock().await;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut matched: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| {
                search.as_ref().map_or(true, |s| {
                    p.name.to_lowercase().contains(s) || p.description.to_lowercase().contains(s)
                })
            })
            .filter(|p| filter.category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| filter.min_price.map_or(true, |min| p.price >= min))
            .filter(|p| filter.max_price.map_or(true, |max| p.price <= max))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match filter.sort {
                ProductSort::Id => a.product_id.cmp(&b.product_id),
                ProductSort::Name => a.name.cmp(&b.name),
                ProductSort::Brand => a.brand.cmp(&b.brand),
                ProductSort::Category => a.category.cmp(&b.category),
                ProductSort::Price => a.price.cmp(&b.price),
                ProductSort::Date => a.created_utc.cmp(&b.created_utc),
            };
            match filter.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        Ok((paginate(&matched, filter.page, filter.page_size), total))
    }

    async fn recent_products(&self, limit: u32) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.lock().await;
        let mut products = tables.products.clone();
        products.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
        products.truncate(limit as usize);
        Ok(products)
    }

    async fn count_products_by_category(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let tables = self.tables.lock().await;
        let mut counts: HashMap<String, u64> = HashMap::new();
        for product in &tables.products {
            *counts.entry(product.category.clone()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    async fn insert_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.orders.push(order.clone());
        tables.order_items.extend(items.iter().cloned());
        Ok(())
    }

    async fn find_order(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<Option<OrderDetail>, StoreError> {
        let tables = self.tables.lock().await;
        let order = tables
            .orders
            .iter()
            .find(|o| o.order_id == order_id && owner.map_or(true, |a| o.account_id == a));
        match order {
            Some(order) => Ok(Some(tables.detail(order)?)),
            None => Ok(None),
        }
    }

    async fn find_order_header(&self, order_id: Uuid) -> Result<Option<Order>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned())
    }

    async fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables
            .orders
            .iter_mut()
            .find(|o| o.order_id == order.order_id)
        {
            existing.payment_status = order.payment_status.clone();
            existing.order_status = order.order_status.clone();
        }
        Ok(())
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.orders.len();
        tables.orders.retain(|o| o.order_id != order_id);
        tables.order_items.retain(|i| i.order_id != order_id);
        Ok(tables.orders.len() < before)
    }

    async fn list_orders(
        &self,
        owner: Option<Uuid>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<OrderDetail>, u64), StoreError> {
        let tables = self.tables.lock().await;
        let mut matched: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| owner.map_or(true, |a| o.account_id == a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
        let total = matched.len() as u64;
        let page_rows = paginate(&matched, page, page_size);

        let mut details = Vec::with_capacity(page_rows.len());
        for order in &page_rows {
            details.push(tables.detail(order)?);
        }
        Ok((details, total))
    }

    async fn total_sales(&self) -> Result<Decimal, StoreError> {
        let tables = self.tables.lock().await;
        let shipping: Decimal = tables.orders.iter().map(|o| o.shipping_fee).sum();
        let items: Decimal = tables
            .order_items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum();
        Ok(shipping + items)
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.orders.len() as u64)
    }

    async fn count_orders_with_status(&self, order_status: &str) -> Result<u64, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.order_status.eq_ignore_ascii_case(order_status))
            .count() as u64)
    }

    // -------------------------------------------------------------------------
    // Suppliers
    // -------------------------------------------------------------------------

    async fn insert_supplier(&self, supplier: &Supplier) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.suppliers.iter().any(|s| s.email == supplier.email) {
            return Err(StoreError::UniqueViolation("email"));
        }
        tables.suppliers.push(supplier.clone());
        Ok(())
    }

    async fn update_supplier(&self, supplier: &Supplier) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .suppliers
            .iter()
            .any(|s| s.email == supplier.email && s.supplier_id != supplier.supplier_id)
        {
            return Err(StoreError::UniqueViolation("email"));
        }
        match tables
            .suppliers
            .iter_mut()
            .find(|s| s.supplier_id == supplier.supplier_id)
        {
            Some(existing) => {
                *existing = supplier.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_supplier(&self, supplier_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.suppliers.len();
        tables.suppliers.retain(|s| s.supplier_id != supplier_id);
        Ok(tables.suppliers.len() < before)
    }

    async fn find_supplier(&self, supplier_id: Uuid) -> Result<Option<Supplier>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .suppliers
            .iter()
            .find(|s| s.supplier_id == supplier_id)
            .cloned())
    }

    async fn list_suppliers(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Supplier>, u64), StoreError> {
        let tables = self.tables.lock().await;
        let mut suppliers = tables.suppliers.clone();
        suppliers.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
        let total = suppliers.len() as u64;
        Ok((paginate(&suppliers, page, page_size), total))
    }
}
