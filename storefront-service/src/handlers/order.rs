//! Order handlers. All routes here sit behind the auth middleware; role
//! and ownership checks live in the service layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::order::{
        CreateOrderRequest, OrderCountsResponse, OrderListQuery, TotalSalesResponse,
        UpdateOrderStatusRequest,
    },
    dtos::{MessageResponse, PageResponse},
    middleware::AuthUser,
    models::{OrderResponse, OrderStatus, PaymentMethod, PaymentStatus},
    utils::ValidatedJson,
    AppState,
};

/// GET /orders/payment-methods
pub async fn payment_methods() -> Json<Vec<&'static str>> {
    Json(PaymentMethod::ALL.iter().map(|m| m.as_str()).collect())
}

/// GET /orders/payment-statuses
pub async fn payment_statuses() -> Json<Vec<&'static str>> {
    Json(PaymentStatus::ALL.iter().map(|s| s.as_str()).collect())
}

/// GET /orders/statuses
pub async fn order_statuses() -> Json<Vec<&'static str>> {
    Json(OrderStatus::ALL.iter().map(|s| s.as_str()).collect())
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = state.orders.create_order(identity, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders?page=
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<PageResponse<OrderResponse>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let (items, total_pages, total_count) = state.orders.list_orders(identity, page).await?;

    Ok(Json(PageResponse {
        items,
        page,
        total_pages,
        total_count,
    }))
}

/// GET /orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.orders.get_order(identity, order_id).await?;
    Ok(Json(order))
}

/// PATCH /orders/:id/status (admin)
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(order_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.orders.update_status(identity, order_id, req).await?;
    Ok(Json(order))
}

/// DELETE /orders/:id (admin)
pub async fn delete_order(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.orders.delete_order(identity, order_id).await?;
    Ok(Json(MessageResponse {
        message: "Order deleted".to_string(),
    }))
}

/// GET /orders/total-sales (admin)
pub async fn total_sales(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<TotalSalesResponse>, AppError> {
    let total_sales = state.orders.total_sales(identity).await?;
    Ok(Json(TotalSalesResponse { total_sales }))
}

/// GET /orders/counts (admin)
pub async fn order_counts(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<OrderCountsResponse>, AppError> {
    let counts = state.orders.order_counts(identity).await?;
    Ok(Json(counts))
}
