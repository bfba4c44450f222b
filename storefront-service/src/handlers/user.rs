//! Profile handlers for the authenticated account, plus the admin-only
//! user directory.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::auth::{ChangePasswordRequest, UpdateProfileRequest, UserListQuery},
    dtos::{MessageResponse, PageResponse},
    middleware::AuthUser,
    models::{AccountResponse, Role},
    utils::ValidatedJson,
    AppState,
};

/// GET /users/me
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.accounts.get_profile(identity.account_id).await?;
    Ok(Json(account))
}

/// PUT /users/me
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state
        .accounts
        .update_profile(identity.account_id, req)
        .await?;
    Ok(Json(account))
}

/// POST /users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .accounts
        .change_password(identity.account_id, req)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<PageResponse<AccountResponse>>, AppError> {
    identity.require_role(Role::Admin).map_err(AppError::from)?;

    let role = query.role.as_deref().map(Role::from_string);
    let page = query.page.unwrap_or(1);
    let (items, total_pages, total_count) = state.accounts.list_users(role, page).await?;

    Ok(Json(PageResponse {
        items,
        page: page.max(1),
        total_pages,
        total_count,
    }))
}

#[derive(Debug, Serialize)]
pub struct UserCountResponse {
    pub count: u64,
}

/// GET /users/count (admin)
pub async fn count_users(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserCountResponse>, AppError> {
    identity.require_role(Role::Admin).map_err(AppError::from)?;

    let role = query.role.as_deref().map(Role::from_string);
    let count = state.accounts.count_users(role).await?;
    Ok(Json(UserCountResponse { count }))
}

/// GET /users/:id (owner or admin)
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    identity
        .require_owner_or_role(account_id, Role::Admin)
        .map_err(AppError::from)?;

    let account = state.accounts.get_user(account_id).await?;
    Ok(Json(account))
}
