//! PostgreSQL implementation of the [`Store`] trait.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    Account, Order, OrderDetail, OrderItem, OrderItemDetail, Product, ProductFilter, ProductSort,
    ResetToken, Role, SortOrder, Supplier,
};
use crate::store::{Store, StoreError};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "storefront-service"))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Other(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Other(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Load account and line items for an order header.
    async fn load_detail(&self, order: Order) -> Result<OrderDetail, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT account_id, first_name, last_name, email, phone, address, password_hash, role, created_utc
             FROM accounts WHERE account_id = $1",
        )
        .bind(order.account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Other(anyhow::anyhow!("Failed to load order account: {}", e)))?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT order_item_id, order_id, product_id, quantity, unit_price
             FROM order_items WHERE order_id = $1 ORDER BY order_item_id",
        )
        .bind(order.order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Other(anyhow::anyhow!("Failed to load line items: {}", e)))?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_id, name, brand, category, price, description, created_utc
             FROM products WHERE product_id = ANY($1)",
        )
        .bind(&product_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Other(anyhow::anyhow!("Failed to load item products: {}", e)))?;

        let mut by_id: HashMap<Uuid, Product> =
            products.into_iter().map(|p| (p.product_id, p)).collect();

        let mut details = Vec::with_capacity(items.len());
        for item in items {
            let product = by_id.remove(&item.product_id).ok_or_else(|| {
                StoreError::Other(anyhow::anyhow!(
                    "Line item references missing product {}",
                    item.product_id
                ))
            })?;
            details.push(OrderItemDetail { item, product });
        }

        Ok(OrderDetail {
            order,
            account,
            items: details,
        })
    }
}

fn db_err(context: &str, e: sqlx::Error) -> StoreError {
    StoreError::Other(anyhow::anyhow!("{}: {}", context, e))
}

fn unique_or(context: &str, column: &'static str, e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::UniqueViolation(column)
        }
        _ => StoreError::Other(anyhow::anyhow!("{}: {}", context, e)),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Health check failed", e))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    #[instrument(skip(self, account), fields(account_id = %account.account_id))]
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_id, first_name, last_name, email, phone, address, password_hash, role, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.account_id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.address)
        .bind(&account.password_hash)
        .bind(&account.role)
        .bind(account.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or("Failed to insert account", "email", e))?;

        Ok(())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, Account>(
            "SELECT account_id, first_name, last_name, email, phone, address, password_hash, role, created_utc
             FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find account by email", e))
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, Account>(
            "SELECT account_id, first_name, last_name, email, phone, address, password_hash, role, created_utc
             FROM accounts WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find account", e))
    }

    #[instrument(skip(self, account), fields(account_id = %account.account_id))]
    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = $2, last_name = $3, email = $4, phone = $5, address = $6,
                password_hash = $7, role = $8
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.address)
        .bind(&account.password_hash)
        .bind(&account.role)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or("Failed to update account", "email", e))?;

        Ok(())
    }

    async fn list_accounts(
        &self,
        role: Option<Role>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Account>, u64), StoreError> {
        let role_str = role.map(|r| r.as_str().to_string());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts WHERE ($1::varchar IS NULL OR role = $1)",
        )
        .bind(&role_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count accounts", e))?;

        let offset = (page.saturating_sub(1) as i64) * page_size as i64;
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, first_name, last_name, email, phone, address, password_hash, role, created_utc
            FROM accounts
            WHERE ($1::varchar IS NULL OR role = $1)
            ORDER BY created_utc DESC, account_id DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(&role_str)
        .bind(offset)
        .bind(page_size as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list accounts", e))?;

        Ok((accounts, count as u64))
    }

    async fn count_accounts(&self, role: Option<Role>) -> Result<u64, StoreError> {
        let role_str = role.map(|r| r.as_str().to_string());
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts WHERE ($1::varchar IS NULL OR role = $1)",
        )
        .bind(&role_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count accounts", e))?;
        Ok(count as u64)
    }

    // -------------------------------------------------------------------------
    // Reset tokens
    // -------------------------------------------------------------------------

    #[instrument(skip(self, token))]
    async fn replace_reset_token(&self, token: &ResetToken) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            StoreError::Other(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query("DELETE FROM reset_tokens WHERE email = $1")
            .bind(&token.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("Failed to delete old reset token", e))?;

        sqlx::query(
            "INSERT INTO reset_tokens (email, token, created_utc) VALUES ($1, $2, $3)",
        )
        .bind(&token.email)
        .bind(&token.token)
        .bind(token.created_utc)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to insert reset token", e))?;

        tx.commit().await.map_err(|e| {
            StoreError::Other(anyhow::anyhow!("Failed to commit reset token: {}", e))
        })?;

        Ok(())
    }

    async fn find_reset_token(&self, token: &str) -> Result<Option<ResetToken>, StoreError> {
        sqlx::query_as::<_, ResetToken>(
            "SELECT email, token, created_utc FROM reset_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find reset token", e))
    }

    async fn delete_reset_token(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM reset_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete reset token", e))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (product_id, name, brand, category, price, description, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.product_id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert product", e))?;
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, brand = $3, category = $4, price = $5, description = $6
            WHERE product_id = $1
            "#,
        )
        .bind(product.product_id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.description)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, product_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT product_id, name, brand, category, price, description, created_utc
             FROM products WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find product", e))
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, u64), StoreError> {
        let search = filter.search.as_ref().map(|s| format!("%{}%", s));

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::varchar IS NULL OR name ILIKE $1 OR description ILIKE $1)
              AND ($2::varchar IS NULL OR category = $2)
              AND ($3::numeric IS NULL OR price >= $3)
              AND ($4::numeric IS NULL OR price <= $4)
            "#,
        )
        .bind(&search)
        .bind(&filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count products", e))?;

        // ORDER BY column comes from a closed enum, never from user input.
        let order_by = match (filter.sort, filter.order) {
            (ProductSort::Name, SortOrder::Asc) => "name ASC",
            (ProductSort::Name, SortOrder::Desc) => "name DESC",
            (ProductSort::Brand, SortOrder::Asc) => "brand ASC",
            (ProductSort::Brand, SortOrder::Desc) => "brand DESC",
            (ProductSort::Category, SortOrder::Asc) => "category ASC",
            (ProductSort::Category, SortOrder::Desc) => "category DESC",
            (ProductSort::Price, SortOrder::Asc) => "price ASC",
            (ProductSort::Price, SortOrder::Desc) => "price DESC",
            (ProductSort::Date, SortOrder::Asc) => "created_utc ASC",
            (ProductSort::Date, SortOrder::Desc) => "created_utc DESC",
            (ProductSort::Id, SortOrder::Asc) => "product_id ASC",
            (ProductSort::Id, SortOrder::Desc) => "product_id DESC",
        };

        let offset = (filter.page.saturating_sub(1) as i64) * filter.page_size as i64;
        let query = format!(
            r#"
            SELECT product_id, name, brand, category, price, description, created_utc
            FROM products
            WHERE ($1::varchar IS NULL OR name ILIKE $1 OR description ILIKE $1)
              AND ($2::varchar IS NULL OR category = $2)
              AND ($3::numeric IS NULL OR price >= $3)
              AND ($4::numeric IS NULL OR price <= $4)
            ORDER BY {}
            OFFSET $5 LIMIT $6
            "#,
            order_by
        );

        let products = sqlx::query_as::<_, Product>(&query)
            .bind(&search)
            .bind(&filter.category)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(offset)
            .bind(filter.page_size as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list products", e))?;

        Ok((products, count as u64))
    }

    async fn recent_products(&self, limit: u32) -> Result<Vec<Product>, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT product_id, name, brand, category, price, description, created_utc
             FROM products ORDER BY created_utc DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list recent products", e))
    }

    async fn count_products_by_category(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let rows = sqlx::query(
            "SELECT category, COUNT(*) AS count FROM products GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count products by category", e))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let category: String = row.get("category");
                let count: i64 = row.get("count");
                (category, count as u64)
            })
            .collect())
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[instrument(skip(self, order, items), fields(order_id = %order.order_id))]
    async fn insert_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            StoreError::Other(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO orders (order_id, account_id, shipping_fee, delivery_address,
                                payment_method, payment_status, order_status, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.order_id)
        .bind(order.account_id)
        .bind(order.shipping_fee)
        .bind(&order.delivery_address)
        .bind(&order.payment_method)
        .bind(&order.payment_status)
        .bind(&order.order_status)
        .bind(order.created_utc)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to insert order", e))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(item.order_item_id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("Failed to insert line item", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Other(anyhow::anyhow!("Failed to commit order: {}", e)))?;

        info!(order_id = %order.order_id, items = items.len(), "Order persisted");

        Ok(())
    }

    async fn find_order(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<Option<OrderDetail>, StoreError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, account_id, shipping_fee, delivery_address,
                   payment_method, payment_status, order_status, created_utc
            FROM orders
            WHERE order_id = $1 AND ($2::uuid IS NULL OR account_id = $2)
            "#,
        )
        .bind(order_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find order", e))?;

        match order {
            Some(order) => Ok(Some(self.load_detail(order).await?)),
            None => Ok(None),
        }
    }

    async fn find_order_header(&self, order_id: Uuid) -> Result<Option<Order>, StoreError> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, account_id, shipping_fee, delivery_address,
                   payment_method, payment_status, order_status, created_utc
            FROM orders WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find order header", e))
    }

    async fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE orders SET payment_status = $2, order_status = $3 WHERE order_id = $1",
        )
        .bind(order.order_id)
        .bind(&order.payment_status)
        .bind(&order.order_status)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update order", e))?;
        Ok(())
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<bool, StoreError> {
        // Line items cascade via the FK constraint.
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete order", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_orders(
        &self,
        owner: Option<Uuid>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<OrderDetail>, u64), StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE ($1::uuid IS NULL OR account_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count orders", e))?;

        let offset = (page.saturating_sub(1) as i64) * page_size as i64;
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, account_id, shipping_fee, delivery_address,
                   payment_method, payment_status, order_status, created_utc
            FROM orders
            WHERE ($1::uuid IS NULL OR account_id = $1)
            ORDER BY created_utc DESC, order_id DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(owner)
        .bind(offset)
        .bind(page_size as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list orders", e))?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.load_detail(order).await?);
        }

        Ok((details, count as u64))
    }

    async fn total_sales(&self) -> Result<Decimal, StoreError> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE((SELECT SUM(shipping_fee) FROM orders), 0)
                 + COALESCE((SELECT SUM(unit_price * quantity) FROM order_items), 0)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to compute total sales", e))
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count orders", e))?;
        Ok(count as u64)
    }

    async fn count_orders_with_status(&self, order_status: &str) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE LOWER(order_status) = LOWER($1)",
        )
        .bind(order_status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count orders by status", e))?;
        Ok(count as u64)
    }

    // -------------------------------------------------------------------------
    // Suppliers
    // -------------------------------------------------------------------------

    #[instrument(skip(self, supplier), fields(supplier_id = %supplier.supplier_id))]
    async fn insert_supplier(&self, supplier: &Supplier) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO suppliers (supplier_id, name, email, phone, address, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(supplier.supplier_id)
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or("Failed to insert supplier", "email", e))?;
        Ok(())
    }

    async fn update_supplier(&self, supplier: &Supplier) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $2, email = $3, phone = $4, address = $5
            WHERE supplier_id = $1
            "#,
        )
        .bind(supplier.supplier_id)
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or("Failed to update supplier", "email", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_supplier(&self, supplier_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE supplier_id = $1")
            .bind(supplier_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete supplier", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_supplier(&self, supplier_id: Uuid) -> Result<Option<Supplier>, StoreError> {
        sqlx::query_as::<_, Supplier>(
            "SELECT supplier_id, name, email, phone, address, created_utc
             FROM suppliers WHERE supplier_id = $1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find supplier", e))
    }

    async fn list_suppliers(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Supplier>, u64), StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count suppliers", e))?;

        let offset = (page.saturating_sub(1) as i64) * page_size as i64;
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT supplier_id, name, email, phone, address, created_utc
            FROM suppliers
            ORDER BY created_utc DESC, supplier_id DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(page_size as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list suppliers", e))?;

        Ok((suppliers, count as u64))
    }
}
