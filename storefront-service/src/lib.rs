pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use service_core::axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::StorefrontConfig;
use crate::services::{
    AccountService, CatalogService, JwtService, Notifier, OrderService, PricingEngine,
    SupplierService,
};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: StorefrontConfig,
    pub store: Arc<dyn Store>,
    pub jwt: JwtService,
    pub notifier: Arc<dyn Notifier>,
    pub accounts: AccountService,
    pub pricing: PricingEngine,
    pub orders: OrderService,
    pub catalog: CatalogService,
    pub suppliers: SupplierService,
}

impl AppState {
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let accounts = AccountService::new(store.clone(), notifier.clone(), jwt.clone());
        let pricing = PricingEngine::new(store.clone(), config.orders.shipping_fee);
        let orders = OrderService::new(store.clone(), pricing.clone(), config.orders.page_size);
        let catalog = CatalogService::new(
            store.clone(),
            config.catalog.page_size,
            config.catalog.recent_count,
        );
        let suppliers = SupplierService::new(store.clone());

        Self {
            config,
            store,
            jwt,
            notifier,
            accounts,
            pricing,
            orders,
            catalog,
            suppliers,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Routes behind the auth middleware. Role and ownership rules are
    // enforced further down, in the services.
    let protected = Router::new()
        .route("/users/me", get(handlers::user::get_me).put(handlers::user::update_me))
        .route("/users/me/password", post(handlers::user::change_password))
        .route("/users", get(handlers::user::list_users))
        .route("/users/count", get(handlers::user::count_users))
        .route("/users/:id", get(handlers::user::get_user))
        .route(
            "/orders",
            post(handlers::order::create_order).get(handlers::order::list_orders),
        )
        .route("/orders/total-sales", get(handlers::order::total_sales))
        .route("/orders/counts", get(handlers::order::order_counts))
        .route(
            "/orders/:id",
            get(handlers::order::get_order).delete(handlers::order::delete_order),
        )
        .route("/orders/:id/status", patch(handlers::order::update_status))
        .route("/products", post(handlers::catalog::create_product))
        .route(
            "/products/category-counts",
            get(handlers::catalog::category_counts),
        )
        .route("/products/:id", put(handlers::catalog::update_product))
        .route("/products/:id", delete(handlers::catalog::delete_product))
        .route(
            "/suppliers",
            post(handlers::supplier::create_supplier).get(handlers::supplier::list_suppliers),
        )
        .route(
            "/suppliers/:id",
            get(handlers::supplier::get_supplier)
                .put(handlers::supplier::update_supplier)
                .delete(handlers::supplier::delete_supplier),
        )
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route(
            "/orders/payment-methods",
            get(handlers::order::payment_methods),
        )
        .route(
            "/orders/payment-statuses",
            get(handlers::order::payment_statuses),
        )
        .route("/orders/statuses", get(handlers::order::order_statuses))
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/recent", get(handlers::catalog::recent_products))
        .route("/products/categories", get(handlers::catalog::categories))
        .route("/products/:id", get(handlers::catalog::get_product))
        .route("/cart", get(handlers::cart::price_cart));

    public
        .merge(protected)
        .with_state(state.clone())
        .layer(
            TraceLayer::new_for_http().make_span_with(
                |request: &service_core::axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                },
            ),
        )
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .filter_map(|o| {
                            o.parse::<service_core::axum::http::HeaderValue>()
                                .map_err(|e| {
                                    tracing::error!("Invalid CORS origin '{}': {}", o, e);
                                    e
                                })
                                .ok()
                        })
                        .collect::<Vec<service_core::axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    service_core::axum::http::Method::GET,
                    service_core::axum::http::Method::POST,
                    service_core::axum::http::Method::PUT,
                    service_core::axum::http::Method::PATCH,
                    service_core::axum::http::Method::DELETE,
                    service_core::axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    service_core::axum::http::header::AUTHORIZATION,
                    service_core::axum::http::header::CONTENT_TYPE,
                ]),
        )
}

/// Service health check: verifies the database connection.
pub async fn health_check(
    service_core::axum::extract::State(state): service_core::axum::extract::State<AppState>,
) -> Result<service_core::axum::Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        AppError::DatabaseError(anyhow::anyhow!("Database health check failed"))
    })?;

    Ok(service_core::axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
    })))
}
