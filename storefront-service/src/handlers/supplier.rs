//! Supplier handlers. Admin-only vendor directory.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::supplier::{CreateSupplierRequest, SupplierListQuery, UpdateSupplierRequest},
    dtos::{MessageResponse, PageResponse},
    middleware::AuthUser,
    models::SupplierResponse,
    utils::ValidatedJson,
    AppState,
};

/// POST /suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<SupplierResponse>), AppError> {
    let supplier = state.suppliers.create_supplier(identity, req).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// GET /suppliers?page=
pub async fn list_suppliers(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<SupplierListQuery>,
) -> Result<Json<PageResponse<SupplierResponse>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let (items, total_pages, total_count) = state.suppliers.list_suppliers(identity, page).await?;

    Ok(Json(PageResponse {
        items,
        page,
        total_pages,
        total_count,
    }))
}

/// GET /suppliers/:id
pub async fn get_supplier(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(supplier_id): Path<Uuid>,
) -> Result<Json<SupplierResponse>, AppError> {
    let supplier = state.suppliers.get_supplier(identity, supplier_id).await?;
    Ok(Json(supplier))
}

/// PUT /suppliers/:id
pub async fn update_supplier(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(supplier_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateSupplierRequest>,
) -> Result<Json<SupplierResponse>, AppError> {
    let supplier = state
        .suppliers
        .update_supplier(identity, supplier_id, req)
        .await?;
    Ok(Json(supplier))
}

/// DELETE /suppliers/:id
pub async fn delete_supplier(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(supplier_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.suppliers.delete_supplier(identity, supplier_id).await?;
    Ok(Json(MessageResponse {
        message: "Supplier deleted".to_string(),
    }))
}
