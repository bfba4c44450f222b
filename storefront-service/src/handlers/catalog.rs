//! Catalog handlers: public browsing and admin product management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::product::{
        CategoryCount, CreateProductRequest, ProductListQuery, UpdateProductRequest,
    },
    dtos::{MessageResponse, PageResponse},
    middleware::AuthUser,
    models::Product,
    utils::ValidatedJson,
    AppState,
};

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<PageResponse<Product>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let (items, total_pages, total_count) = state.catalog.list_products(query).await?;

    Ok(Json(PageResponse {
        items,
        page,
        total_pages,
        total_count,
    }))
}

/// GET /products/recent
pub async fn recent_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.catalog.recent_products().await?;
    Ok(Json(products))
}

/// GET /products/categories
pub async fn categories(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.catalog.categories().to_vec())
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = state.catalog.get_product(product_id).await?;
    Ok(Json(product))
}

/// POST /products (admin)
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.catalog.create_product(identity, req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id (admin)
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(product_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = state.catalog.update_product(identity, product_id, req).await?;
    Ok(Json(product))
}

/// DELETE /products/:id (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog.delete_product(identity, product_id).await?;
    Ok(Json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}

/// GET /products/category-counts (admin)
pub async fn category_counts(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    let counts = state.catalog.category_counts(identity).await?;
    Ok(Json(counts))
}
