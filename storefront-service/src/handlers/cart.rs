//! Cart preview handler. Prices a delimited product-id list without
//! touching any order state.

use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::order::{CartQuery, CartResponse},
    AppState,
};

/// GET /cart?product_ids=a,b,a
pub async fn price_cart(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> Result<Json<CartResponse>, AppError> {
    let raw = query.product_ids.unwrap_or_default();
    let cart = state.pricing.price_cart(&raw).await?;
    Ok(Json(cart))
}
