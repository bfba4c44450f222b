use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient privileges")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Product {0} is unavailable")]
    UnavailableProduct(Uuid),

    #[error("Email error: {0}")]
    Delivery(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation("email") => ServiceError::EmailTaken,
            StoreError::UniqueViolation(column) => {
                ServiceError::Database(anyhow::anyhow!("unique constraint violated on {}", column))
            }
            StoreError::Other(e) => ServiceError::Database(e),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Validation(e) => AppError::BadRequest(anyhow::anyhow!(e)),
            ServiceError::EmailTaken => AppError::Conflict(anyhow::anyhow!("Email already registered")),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::InvalidResetToken => {
                AppError::BadRequest(anyhow::anyhow!("Invalid or expired reset token"))
            }
            ServiceError::Unauthenticated => {
                AppError::Unauthorized(anyhow::anyhow!("Authentication required"))
            }
            ServiceError::Forbidden => {
                AppError::Forbidden(anyhow::anyhow!("Insufficient privileges"))
            }
            ServiceError::NotFound(what) => AppError::NotFound(anyhow::anyhow!("{} not found", what)),
            ServiceError::UnavailableProduct(id) => {
                AppError::BadRequest(anyhow::anyhow!("Product {} is unavailable", id))
            }
            ServiceError::Delivery(e) => AppError::EmailError(e),
        }
    }
}
