//! Password reset token model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Single-use password reset token. At most one live token exists per email;
/// requesting a new one replaces the old. There is no time-based expiry -
/// a token stays live until superseded or consumed (inherited behavior,
/// see DESIGN.md).
#[derive(Debug, Clone, FromRow)]
pub struct ResetToken {
    pub email: String,
    pub token: String,
    pub created_utc: DateTime<Utc>,
}

impl ResetToken {
    pub fn new(email: String, token: String) -> Self {
        Self {
            email,
            token,
            created_utc: Utc::now(),
        }
    }
}
