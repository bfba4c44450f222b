use std::sync::Arc;

use uuid::Uuid;

use crate::models::ResetToken;
use crate::services::error::ServiceError;
use crate::store::Store;

/// Issues and redeems single-use password reset tokens. At most one token
/// is live per email; issuing a new one supersedes the old.
#[derive(Clone)]
pub struct ResetTokenService {
    store: Arc<dyn Store>,
}

impl ResetTokenService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Issue a fresh token for the email, replacing any live one.
    pub async fn issue(&self, email: &str) -> Result<String, ServiceError> {
        let token = format!("{}-{}", Uuid::new_v4(), Uuid::new_v4());
        let record = ResetToken::new(email.to_string(), token.clone());
        self.store.replace_reset_token(&record).await?;
        Ok(token)
    }

    /// Look up a live token. The caller decides when to redeem it.
    pub async fn find(&self, token: &str) -> Result<Option<ResetToken>, ServiceError> {
        Ok(self.store.find_reset_token(token).await?)
    }

    /// Remove a token once its reset has gone through.
    pub async fn redeem(&self, token: &str) -> Result<(), ServiceError> {
        self.store.delete_reset_token(token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn service() -> ResetTokenService {
        ResetTokenService::new(Arc::new(MemStore::new()))
    }

    #[tokio::test]
    async fn issue_creates_a_findable_token() -> Result<(), ServiceError> {
        let service = service();

        let token = service.issue("a@example.com").await?;
        let found = service.find(&token).await?.expect("token should exist");
        assert_eq!(found.email, "a@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn reissue_supersedes_the_previous_token() -> Result<(), ServiceError> {
        let service = service();

        let first = service.issue("a@example.com").await?;
        let second = service.issue("a@example.com").await?;

        assert!(service.find(&first).await?.is_none());
        assert!(service.find(&second).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn tokens_for_different_emails_coexist() -> Result<(), ServiceError> {
        let service = service();

        let a = service.issue("a@example.com").await?;
        let b = service.issue("b@example.com").await?;

        assert!(service.find(&a).await?.is_some());
        assert!(service.find(&b).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn redeem_removes_the_token() -> Result<(), ServiceError> {
        let service = service();

        let token = service.issue("a@example.com").await?;
        service.redeem(&token).await?;
        assert!(service.find(&token).await?.is_none());

        Ok(())
    }
}
