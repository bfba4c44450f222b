use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dtos::order::{CartItemResponse, CartResponse};
use crate::models::Product;
use crate::services::error::ServiceError;
use crate::store::Store;

/// Prices carts and order lines from a delimited product-id list.
///
/// Preview pricing is lenient: ids that no longer resolve to a product are
/// dropped. Checkout pricing is strict: the first unresolved id aborts.
#[derive(Clone)]
pub struct PricingEngine {
    store: Arc<dyn Store>,
    shipping_fee: Decimal,
}

/// A product resolved for checkout, with its aggregated quantity.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product: Product,
    pub quantity: u32,
}

impl PricingEngine {
    pub fn new(store: Arc<dyn Store>, shipping_fee: Decimal) -> Self {
        Self {
            store,
            shipping_fee,
        }
    }

    pub fn shipping_fee(&self) -> Decimal {
        self.shipping_fee
    }

    /// Parse a comma-separated id list into `(id, quantity)` pairs.
    /// Repeated ids raise the quantity; blank segments are skipped; any
    /// malformed id fails the whole parse.
    pub fn parse_product_ids(raw: &str) -> Result<Vec<(Uuid, u32)>, ServiceError> {
        let mut pairs: Vec<(Uuid, u32)> = Vec::new();
        for segment in raw.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let id = segment.parse::<Uuid>().map_err(|_| {
                ServiceError::Validation(format!("Invalid product id: {}", segment))
            })?;
            match pairs.iter_mut().find(|(existing, _)| *existing == id) {
                Some((_, quantity)) => *quantity += 1,
                None => pairs.push((id, 1)),
            }
        }
        Ok(pairs)
    }

    /// Price a cart preview. Unavailable products drop out silently.
    pub async fn price_cart(&self, raw: &str) -> Result<CartResponse, ServiceError> {
        let pairs = Self::parse_product_ids(raw)?;

        let mut items = Vec::new();
        let mut subtotal = Decimal::ZERO;
        for (id, quantity) in pairs {
            let Some(product) = self.store.find_product(id).await? else {
                continue;
            };
            let line_total = product.price * Decimal::from(quantity);
            subtotal += line_total;
            items.push(CartItemResponse {
                product,
                quantity,
                line_total,
            });
        }

        let shipping_fee = if items.is_empty() {
            Decimal::ZERO
        } else {
            self.shipping_fee
        };

        Ok(CartResponse {
            items,
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
        })
    }

    /// Resolve lines for checkout. Every id must still be available.
    pub async fn price_for_order(&self, raw: &str) -> Result<Vec<PricedLine>, ServiceError> {
        let pairs = Self::parse_product_ids(raw)?;

        let mut lines = Vec::with_capacity(pairs.len());
        for (id, quantity) in pairs {
            let product = self
                .store
                .find_product(id)
                .await?
                .ok_or(ServiceError::UnavailableProduct(id))?;
            lines.push(PricedLine { product, quantity });
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    fn product(name: &str, price: Decimal) -> Product {
        Product::new(
            name.to_string(),
            "Acme".to_string(),
            "Other".to_string(),
            price,
            format!("{} description", name),
        )
    }

    async fn engine_with(products: &[Product]) -> PricingEngine {
        let store = Arc::new(MemStore::new());
        for p in products {
            store.insert_product(p).await.expect("insert product");
        }
        PricingEngine::new(store, dec("5"))
    }

    #[test]
    fn parse_aggregates_repeats_and_skips_blanks() -> Result<(), ServiceError> {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!("{a},{b}, ,{a},,{a}");

        let pairs = PricingEngine::parse_product_ids(&raw)?;
        assert_eq!(pairs, vec![(a, 3), (b, 1)]);

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        let result = PricingEngine::parse_product_ids("not-a-uuid");
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn parse_of_blank_input_is_empty() -> Result<(), ServiceError> {
        assert!(PricingEngine::parse_product_ids("")?.is_empty());
        assert!(PricingEngine::parse_product_ids(" , ,")?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn cart_totals_cover_quantity_and_shipping() -> Result<(), ServiceError> {
        let phone = product("Phone", dec("100"));
        let case = product("Case", dec("15.50"));
        let engine = engine_with(&[phone.clone(), case.clone()]).await;

        let raw = format!("{},{},{}", phone.product_id, case.product_id, phone.product_id);
        let cart = engine.price_cart(&raw).await?;

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.subtotal, dec("215.50"));
        assert_eq!(cart.shipping_fee, dec("5"));
        assert_eq!(cart.total, dec("220.50"));

        Ok(())
    }

    #[tokio::test]
    async fn cart_drops_unavailable_products() -> Result<(), ServiceError> {
        let phone = product("Phone", dec("100"));
        let engine = engine_with(&[phone.clone()]).await;

        let raw = format!("{},{}", phone.product_id, Uuid::new_v4());
        let cart = engine.price_cart(&raw).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal, dec("100"));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_has_no_shipping_fee() -> Result<(), ServiceError> {
        let engine = engine_with(&[]).await;

        let cart = engine.price_cart("").await?;
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_pricing_is_strict() -> Result<(), ServiceError> {
        let phone = product("Phone", dec("100"));
        let engine = engine_with(&[phone.clone()]).await;

        let missing = Uuid::new_v4();
        let raw = format!("{},{}", phone.product_id, missing);
        let result = engine.price_for_order(&raw).await;

        assert!(matches!(
            result,
            Err(ServiceError::UnavailableProduct(id)) if id == missing
        ));

        Ok(())
    }
}
