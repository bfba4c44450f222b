use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dtos::order::{CreateOrderRequest, OrderCountsResponse, UpdateOrderStatusRequest},
    models::{
        Order, OrderItem, OrderResponse, OrderStatus, PaymentMethod, PaymentStatus, Role,
    },
    services::{Identity, PricingEngine, ServiceError},
    store::Store,
};

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
    pricing: PricingEngine,
    page_size: u32,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>, pricing: PricingEngine, page_size: u32) -> Self {
        Self {
            store,
            pricing,
            page_size,
        }
    }

    /// Place an order for the calling account. Pricing is strict: every
    /// product id must resolve, and at least one line item is required.
    /// Header and line items land atomically.
    pub async fn create_order(
        &self,
        caller: Identity,
        req: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let payment_method = PaymentMethod::parse(&req.payment_method).ok_or_else(|| {
            ServiceError::Validation(format!("Invalid payment method: {}", req.payment_method))
        })?;

        let lines = self.pricing.price_for_order(&req.product_ids).await?;
        if lines.is_empty() {
            return Err(ServiceError::Validation(
                "Order must contain at least one product".to_string(),
            ));
        }

        let order = Order {
            order_id: Uuid::new_v4(),
            account_id: caller.account_id,
            shipping_fee: self.pricing.shipping_fee(),
            delivery_address: req.delivery_address,
            payment_method: payment_method.as_str().to_string(),
            payment_status: PaymentStatus::ALL[0].as_str().to_string(),
            order_status: OrderStatus::ALL[0].as_str().to_string(),
            created_utc: Utc::now(),
        };

        let items: Vec<OrderItem> = lines
            .into_iter()
            .map(|line| OrderItem {
                order_item_id: Uuid::new_v4(),
                order_id: order.order_id,
                product_id: line.product.product_id,
                quantity: line.quantity as i32,
                unit_price: line.product.price,
            })
            .collect();

        self.store.insert_order(&order, &items).await?;

        tracing::info!(order_id = %order.order_id, account_id = %caller.account_id, "Order created");

        let detail = self
            .store
            .find_order(order.order_id, None)
            .await?
            .ok_or_else(|| {
                ServiceError::Internal(anyhow::anyhow!("Order vanished after insert"))
            })?;
        Ok(detail.into_response())
    }

    /// Fetch one order. Admins see any order; clients see only their own,
    /// and a foreign order reads as not found rather than forbidden.
    pub async fn get_order(
        &self,
        caller: Identity,
        order_id: Uuid,
    ) -> Result<OrderResponse, ServiceError> {
        let owner = if caller.is_admin() {
            None
        } else {
            Some(caller.account_id)
        };

        let detail = self
            .store
            .find_order(order_id, owner)
            .await?
            .ok_or(ServiceError::NotFound("Order"))?;
        Ok(detail.into_response())
    }

    /// One page of orders, newest first. Admins see everything; clients
    /// see their own.
    pub async fn list_orders(
        &self,
        caller: Identity,
        page: u32,
    ) -> Result<(Vec<OrderResponse>, u32, u64), ServiceError> {
        let owner = if caller.is_admin() {
            None
        } else {
            Some(caller.account_id)
        };

        let page = page.max(1);
        let (details, total) = self.store.list_orders(owner, page, self.page_size).await?;

        let total_pages = (total as u32).div_ceil(self.page_size);
        let orders = details.into_iter().map(|d| d.into_response()).collect();
        Ok((orders, total_pages, total))
    }

    /// Admin-only status update. At least one field must be supplied and
    /// both are validated before either is applied.
    pub async fn update_status(
        &self,
        caller: Identity,
        order_id: Uuid,
        req: UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        caller.require_role(Role::Admin)?;

        if req.payment_status.is_none() && req.order_status.is_none() {
            return Err(ServiceError::Validation(
                "At least one of payment_status or order_status is required".to_string(),
            ));
        }

        let payment_status = req
            .payment_status
            .as_deref()
            .map(|s| {
                PaymentStatus::parse(s).ok_or_else(|| {
                    ServiceError::Validation(format!("Invalid payment status: {}", s))
                })
            })
            .transpose()?;
        let order_status = req
            .order_status
            .as_deref()
            .map(|s| {
                OrderStatus::parse(s)
                    .ok_or_else(|| ServiceError::Validation(format!("Invalid order status: {}", s)))
            })
            .transpose()?;

        let mut order = self
            .store
            .find_order_header(order_id)
            .await?
            .ok_or(ServiceError::NotFound("Order"))?;

        if let Some(status) = payment_status {
            order.payment_status = status.as_str().to_string();
        }
        if let Some(status) = order_status {
            order.order_status = status.as_str().to_string();
        }

        self.store.update_order(&order).await?;

        tracing::info!(order_id = %order_id, "Order status updated");

        let detail = self
            .store
            .find_order(order_id, None)
            .await?
            .ok_or(ServiceError::NotFound("Order"))?;
        Ok(detail.into_response())
    }

    /// Admin-only hard delete; line items go with the header.
    pub async fn delete_order(&self, caller: Identity, order_id: Uuid) -> Result<(), ServiceError> {
        caller.require_role(Role::Admin)?;

        if !self.store.delete_order(order_id).await? {
            return Err(ServiceError::NotFound("Order"));
        }

        tracing::info!(order_id = %order_id, "Order deleted");

        Ok(())
    }

    /// Admin-only revenue aggregate: shipping fees plus line totals across
    /// every order ever placed.
    pub async fn total_sales(&self, caller: Identity) -> Result<Decimal, ServiceError> {
        caller.require_role(Role::Admin)?;
        Ok(self.store.total_sales().await?)
    }

    /// Admin dashboard counters.
    pub async fn order_counts(&self, caller: Identity) -> Result<OrderCountsResponse, ServiceError> {
        caller.require_role(Role::Admin)?;

        let total = self.store.count_orders().await?;
        let delivered = self
            .store
            .count_orders_with_status(OrderStatus::Delivered.as_str())
            .await?;

        Ok(OrderCountsResponse { total, delivered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::store::MemStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    fn client() -> Identity {
        Identity {
            account_id: Uuid::new_v4(),
            role: Role::Client,
        }
    }

    fn admin() -> Identity {
        Identity {
            account_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    async fn seed_account(store: &MemStore, identity: Identity) {
        let mut account = crate::models::Account::new(
            "Test".to_string(),
            "User".to_string(),
            format!("{}@example.com", identity.account_id),
            "555-0100".to_string(),
            "1 Test St".to_string(),
            "$argon2id$fake".to_string(),
        );
        account.account_id = identity.account_id;
        account.role = identity.role.as_str().to_string();
        store.insert_account(&account).await.expect("insert account");
    }

    async fn seed_product(store: &MemStore, price: &str) -> Product {
        let product = Product::new(
            "Widget".to_string(),
            "Acme".to_string(),
            "Other".to_string(),
            dec(price),
            "A widget".to_string(),
        );
        store.insert_product(&product).await.expect("insert product");
        product
    }

    fn service(store: Arc<MemStore>) -> OrderService {
        let pricing = PricingEngine::new(store.clone(), dec("5"));
        OrderService::new(store, pricing, 5)
    }

    fn order_request(product_ids: String) -> CreateOrderRequest {
        CreateOrderRequest {
            product_ids,
            delivery_address: "1 Test St".to_string(),
            payment_method: "cash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_order_aggregates_and_prices_lines() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let product = seed_product(&store, "10").await;
        let service = service(store);

        let raw = format!("{0},{0},{0}", product.product_id);
        let order = service.create_order(caller, order_request(raw)).await?;

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].unit_price, dec("10"));
        assert_eq!(order.payment_status, "pending");
        assert_eq!(order.order_status, "created");
        assert_eq!(order.shipping_fee, dec("5"));

        Ok(())
    }

    #[tokio::test]
    async fn create_order_rejects_empty_and_unknown() {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let service = service(store);

        let empty = service.create_order(caller, order_request(String::new())).await;
        assert!(matches!(empty, Err(ServiceError::Validation(_))));

        let unknown = service
            .create_order(caller, order_request(Uuid::new_v4().to_string()))
            .await;
        assert!(matches!(unknown, Err(ServiceError::UnavailableProduct(_))));

        // Nothing was persisted by the failed attempts.
        let (_, _, total) = service.list_orders(caller, 1).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn create_order_rejects_bad_payment_method() {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let service = service(store);

        let mut req = order_request(Uuid::new_v4().to_string());
        req.payment_method = "barter".to_string();
        let result = service.create_order(caller, req).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn order_price_survives_product_edit() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let mut product = seed_product(&store, "10").await;
        let service = service(store.clone());

        let order = service
            .create_order(caller, order_request(product.product_id.to_string()))
            .await?;

        product.price = dec("99");
        store.update_product(&product).await?;

        let reread = service.get_order(caller, order.order_id).await?;
        assert_eq!(reread.items[0].unit_price, dec("10"));

        Ok(())
    }

    #[tokio::test]
    async fn foreign_order_reads_as_not_found() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let owner = client();
        let stranger = client();
        seed_account(&store, owner).await;
        seed_account(&store, stranger).await;
        let product = seed_product(&store, "10").await;
        let service = service(store);

        let order = service
            .create_order(owner, order_request(product.product_id.to_string()))
            .await?;

        let result = service.get_order(stranger, order.order_id).await;
        assert!(matches!(result, Err(ServiceError::NotFound("Order"))));

        // Admins are unscoped.
        assert!(service.get_order(admin(), order.order_id).await.is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_scopes_and_pages() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let a = client();
        let b = client();
        seed_account(&store, a).await;
        seed_account(&store, b).await;
        let product = seed_product(&store, "10").await;
        let service = service(store);

        for _ in 0..6 {
            service
                .create_order(a, order_request(product.product_id.to_string()))
                .await?;
        }
        service
            .create_order(b, order_request(product.product_id.to_string()))
            .await?;

        let (page1, total_pages, total) = service.list_orders(a, 1).await?;
        assert_eq!(page1.len(), 5);
        assert_eq!(total_pages, 2);
        assert_eq!(total, 6);

        let (page2, _, _) = service.list_orders(a, 2).await?;
        assert_eq!(page2.len(), 1);

        // Past-the-end pages are empty but still report the real totals.
        let (page4, total_pages, total) = service.list_orders(a, 4).await?;
        assert!(page4.is_empty());
        assert_eq!(total_pages, 2);
        assert_eq!(total, 6);

        // Page clamp and admin scope.
        let (clamped, _, _) = service.list_orders(a, 0).await?;
        assert_eq!(clamped.len(), 5);
        let (_, _, all) = service.list_orders(admin(), 1).await?;
        assert_eq!(all, 7);

        Ok(())
    }

    #[tokio::test]
    async fn page_size_comes_from_construction() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let product = seed_product(&store, "10").await;
        let pricing = PricingEngine::new(store.clone(), dec("5"));
        let service = OrderService::new(store, pricing, 2);

        for _ in 0..3 {
            service
                .create_order(caller, order_request(product.product_id.to_string()))
                .await?;
        }

        let (page1, total_pages, total) = service.list_orders(caller, 1).await?;
        assert_eq!(page1.len(), 2);
        assert_eq!(total_pages, 2);
        assert_eq!(total, 3);

        Ok(())
    }

    #[tokio::test]
    async fn update_status_is_admin_only_and_validated() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let product = seed_product(&store, "10").await;
        let service = service(store);

        let order = service
            .create_order(caller, order_request(product.product_id.to_string()))
            .await?;

        let forbidden = service
            .update_status(
                caller,
                order.order_id,
                UpdateOrderStatusRequest {
                    payment_status: Some("paid".to_string()),
                    order_status: None,
                },
            )
            .await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden)));

        let empty = service
            .update_status(
                admin(),
                order.order_id,
                UpdateOrderStatusRequest {
                    payment_status: None,
                    order_status: None,
                },
            )
            .await;
        assert!(matches!(empty, Err(ServiceError::Validation(_))));

        // One invalid field rejects the whole update.
        let mixed = service
            .update_status(
                admin(),
                order.order_id,
                UpdateOrderStatusRequest {
                    payment_status: Some("paid".to_string()),
                    order_status: Some("teleported".to_string()),
                },
            )
            .await;
        assert!(matches!(mixed, Err(ServiceError::Validation(_))));
        let unchanged = service.get_order(admin(), order.order_id).await?;
        assert_eq!(unchanged.payment_status, "pending");

        let updated = service
            .update_status(
                admin(),
                order.order_id,
                UpdateOrderStatusRequest {
                    payment_status: Some("paid".to_string()),
                    order_status: Some("shipped".to_string()),
                },
            )
            .await?;
        assert_eq!(updated.payment_status, "paid");
        assert_eq!(updated.order_status, "shipped");

        Ok(())
    }

    #[tokio::test]
    async fn delete_order_is_admin_only() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let product = seed_product(&store, "10").await;
        let service = service(store);

        let order = service
            .create_order(caller, order_request(product.product_id.to_string()))
            .await?;

        let forbidden = service.delete_order(caller, order.order_id).await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden)));

        service.delete_order(admin(), order.order_id).await?;
        let gone = service.get_order(admin(), order.order_id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound("Order"))));

        let missing = service.delete_order(admin(), Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound("Order"))));

        Ok(())
    }

    #[tokio::test]
    async fn total_sales_sums_fees_and_lines() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let caller = client();
        seed_account(&store, caller).await;
        let product = seed_product(&store, "10").await;
        let service = service(store);

        // Two orders: (2 x 10 + 5) + (1 x 10 + 5) = 40.
        let raw = format!("{0},{0}", product.product_id);
        service.create_order(caller, order_request(raw)).await?;
        service
            .create_order(caller, order_request(product.product_id.to_string()))
            .await?;

        assert!(matches!(
            service.total_sales(caller).await,
            Err(ServiceError::Forbidden)
        ));
        assert_eq!(service.total_sales(admin()).await?, dec("40"));

        Ok(())
    }
}
