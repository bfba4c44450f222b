use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dtos::product::{CategoryCount, CreateProductRequest, ProductListQuery, UpdateProductRequest},
    models::{Product, ProductFilter, ProductSort, Role, SortOrder, CATEGORIES},
    services::{Identity, ServiceError},
    store::Store,
};

/// Public catalog browsing plus admin product management.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
    page_size: u32,
    /// How many products the storefront landing strip shows.
    recent_count: u32,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>, page_size: u32, recent_count: u32) -> Self {
        Self {
            store,
            page_size,
            recent_count,
        }
    }

    /// One page of the catalog, filtered and sorted per the query.
    /// Unknown sort fields fall back to the id column.
    pub async fn list_products(
        &self,
        query: ProductListQuery,
    ) -> Result<(Vec<Product>, u32, u64), ServiceError> {
        let filter = ProductFilter {
            search: query.search.filter(|s| !s.trim().is_empty()),
            category: query.category.filter(|c| !c.trim().is_empty()),
            min_price: query.min_price,
            max_price: query.max_price,
            sort: query
                .sort
                .as_deref()
                .map(ProductSort::from_string)
                .unwrap_or_default(),
            order: query
                .order
                .as_deref()
                .map(SortOrder::from_string)
                .unwrap_or_default(),
            page: query.page.unwrap_or(1).max(1),
            page_size: self.page_size,
        };

        let (products, total) = self.store.list_products(&filter).await?;
        let total_pages = (total as u32).div_ceil(self.page_size);
        Ok((products, total_pages, total))
    }

    /// The newest additions, for the landing page.
    pub async fn recent_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.recent_products(self.recent_count).await?)
    }

    pub async fn get_product(&self, product_id: Uuid) -> Result<Product, ServiceError> {
        self.store
            .find_product(product_id)
            .await?
            .ok_or(ServiceError::NotFound("Product"))
    }

    pub fn categories(&self) -> &'static [&'static str] {
        CATEGORIES
    }

    pub async fn create_product(
        &self,
        caller: Identity,
        req: CreateProductRequest,
    ) -> Result<Product, ServiceError> {
        caller.require_role(Role::Admin)?;

        let product = Product::new(req.name, req.brand, req.category, req.price, req.description);
        self.store.insert_product(&product).await?;

        tracing::info!(product_id = %product.product_id, "Product created");

        Ok(product)
    }

    pub async fn update_product(
        &self,
        caller: Identity,
        product_id: Uuid,
        req: UpdateProductRequest,
    ) -> Result<Product, ServiceError> {
        caller.require_role(Role::Admin)?;

        let mut product = self
            .store
            .find_product(product_id)
            .await?
            .ok_or(ServiceError::NotFound("Product"))?;

        product.name = req.name;
        product.brand = req.brand;
        product.category = req.category;
        product.price = req.price;
        product.description = req.description;

        if !self.store.update_product(&product).await? {
            return Err(ServiceError::NotFound("Product"));
        }

        Ok(product)
    }

    pub async fn delete_product(
        &self,
        caller: Identity,
        product_id: Uuid,
    ) -> Result<(), ServiceError> {
        caller.require_role(Role::Admin)?;

        if !self.store.delete_product(product_id).await? {
            return Err(ServiceError::NotFound("Product"));
        }

        tracing::info!(product_id = %product_id, "Product deleted");

        Ok(())
    }

    /// Admin dashboard: product count per category.
    pub async fn category_counts(
        &self,
        caller: Identity,
    ) -> Result<Vec<CategoryCount>, ServiceError> {
        caller.require_role(Role::Admin)?;

        let counts = self.store.count_products_by_category().await?;
        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    fn admin() -> Identity {
        Identity {
            account_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn client() -> Identity {
        Identity {
            account_id: Uuid::new_v4(),
            role: Role::Client,
        }
    }

    async fn seeded() -> (CatalogService, Arc<MemStore>) {
        let store = Arc::new(MemStore::new());
        let fixtures = [
            ("Alpha Phone", "Phones", "300"),
            ("Beta Phone", "Phones", "150"),
            ("Gamma Laptop", "Computers", "900"),
            ("Delta Cable", "Accessories", "9.99"),
            ("Epsilon Printer", "Printers", "120"),
            ("Zeta Camera", "Cameras", "450"),
            ("Eta Mouse", "Accessories", "25"),
        ];
        for (name, category, price) in fixtures {
            let product = Product::new(
                name.to_string(),
                "Acme".to_string(),
                category.to_string(),
                dec(price),
                format!("{} description", name),
            );
            store.insert_product(&product).await.expect("insert product");
        }
        (CatalogService::new(store.clone(), 6, 5), store)
    }

    fn query() -> ProductListQuery {
        ProductListQuery {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            sort: None,
            order: None,
            page: None,
        }
    }

    #[tokio::test]
    async fn listing_pages_by_six() -> Result<(), ServiceError> {
        let (service, _) = seeded().await;

        let (page1, total_pages, total) = service.list_products(query()).await?;
        assert_eq!(page1.len(), 6);
        assert_eq!(total_pages, 2);
        assert_eq!(total, 7);

        let (page2, _, _) = service
            .list_products(ProductListQuery {
                page: Some(2),
                ..query()
            })
            .await?;
        assert_eq!(page2.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn page_size_and_recent_count_come_from_construction() -> Result<(), ServiceError> {
        let (_, store) = seeded().await;
        let service = CatalogService::new(store, 3, 2);

        let (page1, total_pages, total) = service.list_products(query()).await?;
        assert_eq!(page1.len(), 3);
        assert_eq!(total_pages, 3);
        assert_eq!(total, 7);

        assert_eq!(service.recent_products().await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn filters_compose() -> Result<(), ServiceError> {
        let (service, _) = seeded().await;

        let (phones, _, total) = service
            .list_products(ProductListQuery {
                category: Some("Phones".to_string()),
                max_price: Some(dec("200")),
                ..query()
            })
            .await?;
        assert_eq!(total, 1);
        assert_eq!(phones[0].name, "Beta Phone");

        let (searched, _, _) = service
            .list_products(ProductListQuery {
                search: Some("laptop".to_string()),
                ..query()
            })
            .await?;
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].name, "Gamma Laptop");

        Ok(())
    }

    #[tokio::test]
    async fn sorting_honors_field_and_direction() -> Result<(), ServiceError> {
        let (service, _) = seeded().await;

        let (cheapest_first, _, _) = service
            .list_products(ProductListQuery {
                sort: Some("price".to_string()),
                order: Some("asc".to_string()),
                ..query()
            })
            .await?;
        assert_eq!(cheapest_first[0].name, "Delta Cable");

        // Unknown sort fields fall back to the id column rather than failing.
        let (fallback, _, total) = service
            .list_products(ProductListQuery {
                sort: Some("popularity".to_string()),
                ..query()
            })
            .await?;
        assert_eq!(total, 7);
        assert!(!fallback.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn recent_returns_five_newest() -> Result<(), ServiceError> {
        let (service, _) = seeded().await;

        let recent = service.recent_products().await?;
        assert_eq!(recent.len(), 5);
        for pair in recent.windows(2) {
            assert!(pair[0].created_utc >= pair[1].created_utc);
        }

        Ok(())
    }

    #[tokio::test]
    async fn product_management_is_admin_only() -> Result<(), ServiceError> {
        let (service, _) = seeded().await;

        let req = CreateProductRequest {
            name: "Theta Tablet".to_string(),
            brand: "Acme".to_string(),
            category: "Computers".to_string(),
            price: dec("499"),
            description: "A tablet".to_string(),
        };

        let forbidden = service
            .create_product(
                client(),
                CreateProductRequest {
                    name: req.name.clone(),
                    brand: req.brand.clone(),
                    category: req.category.clone(),
                    price: req.price,
                    description: req.description.clone(),
                },
            )
            .await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden)));

        let created = service.create_product(admin(), req).await?;
        assert_eq!(service.get_product(created.product_id).await?.name, "Theta Tablet");

        service.delete_product(admin(), created.product_id).await?;
        let gone = service.get_product(created.product_id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound("Product"))));

        Ok(())
    }

    #[tokio::test]
    async fn category_counts_group_products() -> Result<(), ServiceError> {
        let (service, _) = seeded().await;

        let counts = service.category_counts(admin()).await?;
        let accessories = counts
            .iter()
            .find(|c| c.category == "Accessories")
            .expect("category present");
        assert_eq!(accessories.count, 2);

        assert!(matches!(
            service.category_counts(client()).await,
            Err(ServiceError::Forbidden)
        ));

        Ok(())
    }
}
