//! Authentication handlers: registration, login and the password reset flow.

use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

use crate::{
    dtos::auth::{
        ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    },
    dtos::MessageResponse,
    utils::ValidatedJson,
    AppState,
};

/// Register a new client account. The response signs the caller in, so no
/// follow-up login is needed.
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let response = state.accounts.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange credentials for a token.
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.accounts.login(req).await?;
    Ok(Json(response))
}

/// Request a password reset token by email.
///
/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.accounts.forgot_password(req).await?;
    Ok(Json(MessageResponse {
        message: "Password reset instructions sent".to_string(),
    }))
}

/// Redeem a reset token and set a new password.
///
/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.accounts.reset_password(req).await?;
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
