use std::sync::Arc;

use crate::{
    dtos::auth::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
        RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
    },
    models::{Account, AccountResponse, Role},
    services::{JwtService, Notifier, ResetTokenService, ServiceError},
    store::Store,
    utils::{hash_password, verify_password, Password, PasswordHashString},
};

/// Page size for the admin user directory.
const USER_PAGE_SIZE: u32 = 5;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    jwt: JwtService,
    reset_tokens: ResetTokenService,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, jwt: JwtService) -> Self {
        let reset_tokens = ResetTokenService::new(store.clone());
        Self {
            store,
            notifier,
            jwt,
            reset_tokens,
        }
    }

    /// Register a new client account and sign the caller in. The email must
    /// be unused; the credential is stored only in hashed form.
    pub async fn register(&self, req: RegisterRequest) -> Result<LoginResponse, ServiceError> {
        let password_hash = hash_password(&Password::new(req.password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let account = Account::new(
            req.first_name,
            req.last_name,
            req.email,
            req.phone,
            req.address,
            password_hash.into_string(),
        );

        self.store.insert_account(&account).await?;

        let token = self.jwt.generate_token(account.account_id, account.role())?;

        tracing::info!(account_id = %account.account_id, "Account registered");

        Ok(LoginResponse {
            token,
            account: account.sanitized(),
        })
    }

    /// Exchange credentials for a signed token. Unknown email and wrong
    /// password fail identically.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let account = self
            .store
            .find_account_by_email(&req.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(account.password_hash.clone()),
        )
        .map_err(|_| ServiceError::InvalidCredentials)?;

        let token = self.jwt.generate_token(account.account_id, account.role())?;

        tracing::info!(account_id = %account.account_id, "Login succeeded");

        Ok(LoginResponse {
            token,
            account: account.sanitized(),
        })
    }

    /// Issue a reset token and mail it to the account holder. An unknown
    /// email reports not-found.
    pub async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<(), ServiceError> {
        let account = self
            .store
            .find_account_by_email(&req.email)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        let token = self.reset_tokens.issue(&account.email).await?;

        let body = format!(
            "Hello {},\n\nWe received a request to reset your password. \
             Use the following token to choose a new one:\n\n{}\n\n\
             If you didn't request this, you can ignore this message.",
            account.full_name(),
            token
        );
        self.notifier
            .send(&account.email, &account.full_name(), "Reset your password", &body)
            .await?;

        tracing::info!(account_id = %account.account_id, "Password reset requested");

        Ok(())
    }

    /// Redeem a reset token and set the new password. The token is removed
    /// only after the new credential is stored.
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), ServiceError> {
        let record = self
            .reset_tokens
            .find(&req.token)
            .await?
            .ok_or(ServiceError::InvalidResetToken)?;

        let mut account = self
            .store
            .find_account_by_email(&record.email)
            .await?
            .ok_or(ServiceError::InvalidResetToken)?;

        let password_hash = hash_password(&Password::new(req.new_password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        account.password_hash = password_hash.into_string();
        self.store.update_account(&account).await?;
        self.reset_tokens.redeem(&req.token).await?;

        tracing::info!(account_id = %account.account_id, "Password reset completed");

        Ok(())
    }

    pub async fn get_profile(&self, account_id: uuid::Uuid) -> Result<AccountResponse, ServiceError> {
        let account = self
            .store
            .find_account_by_id(account_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;
        Ok(account.sanitized())
    }

    /// Update contact details. Role and credential are untouched.
    pub async fn update_profile(
        &self,
        account_id: uuid::Uuid,
        req: UpdateProfileRequest,
    ) -> Result<AccountResponse, ServiceError> {
        let mut account = self
            .store
            .find_account_by_id(account_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        account.first_name = req.first_name;
        account.last_name = req.last_name;
        account.email = req.email;
        account.phone = req.phone;
        account.address = req.address;

        self.store.update_account(&account).await?;

        Ok(account.sanitized())
    }

    /// Replace the caller's password. The caller is already authenticated,
    /// so the new credential is simply re-hashed and stored.
    pub async fn change_password(
        &self,
        account_id: uuid::Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), ServiceError> {
        let mut account = self
            .store
            .find_account_by_id(account_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        let password_hash = hash_password(&Password::new(req.new_password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        account.password_hash = password_hash.into_string();
        self.store.update_account(&account).await?;

        tracing::info!(account_id = %account.account_id, "Password changed");

        Ok(())
    }

    /// Admin directory: one page of accounts, optionally filtered by role.
    pub async fn list_users(
        &self,
        role: Option<Role>,
        page: u32,
    ) -> Result<(Vec<AccountResponse>, u32, u64), ServiceError> {
        let page = page.max(1);
        let (accounts, total) = self
            .store
            .list_accounts(role, page, USER_PAGE_SIZE)
            .await?;

        let total_pages = (total as u32).div_ceil(USER_PAGE_SIZE);
        let users = accounts.iter().map(Account::sanitized).collect();
        Ok((users, total_pages, total))
    }

    pub async fn get_user(&self, account_id: uuid::Uuid) -> Result<AccountResponse, ServiceError> {
        self.get_profile(account_id).await
    }

    pub async fn count_users(&self, role: Option<Role>) -> Result<u64, ServiceError> {
        Ok(self.store.count_accounts(role).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::services::notifier::MockNotifier;
    use crate::store::MemStore;

    fn jwt() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "a-test-secret-long-enough-for-hs512".to_string(),
            expiry_hours: 24,
        })
    }

    fn service() -> (AccountService, Arc<MemStore>, Arc<MockNotifier>) {
        let store = Arc::new(MemStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let service = AccountService::new(store.clone(), notifier.clone(), jwt());
        (service, store, notifier)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            address: "1 Analytical Way".to_string(),
            password: "difference-engine".to_string(),
        }
    }

    #[tokio::test]
    async fn register_creates_client_without_credential_leak() -> Result<(), ServiceError> {
        let (service, store, _) = service();

        let response = service.register(register_request("ada@example.com")).await?;
        assert_eq!(response.account.role, "client");

        let stored = store
            .find_account_by_email("ada@example.com")
            .await?
            .expect("account should exist");
        assert_ne!(stored.password_hash, "difference-engine");
        assert!(stored.password_hash.starts_with("$argon2"));

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() -> Result<(), ServiceError> {
        let (service, _, _) = service();

        service.register(register_request("ada@example.com")).await?;
        let result = service.register(register_request("ada@example.com")).await;
        assert!(matches!(result, Err(ServiceError::EmailTaken)));

        Ok(())
    }

    #[tokio::test]
    async fn register_signs_the_caller_in() -> Result<(), ServiceError> {
        let (service, _, _) = service();

        let response = service.register(register_request("ada@example.com")).await?;

        // The response carries an issued token alongside the profile.
        let claims = jwt().validate_token(&response.token)?;
        assert_eq!(claims.sub, response.account.account_id.to_string());
        assert_eq!(claims.role, "client");

        Ok(())
    }

    #[tokio::test]
    async fn login_returns_verifiable_token() -> Result<(), ServiceError> {
        let (service, _, _) = service();
        let registered = service.register(register_request("ada@example.com")).await?;

        let response = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "difference-engine".to_string(),
            })
            .await?;

        let claims = jwt().validate_token(&response.token)?;
        assert_eq!(claims.sub, registered.account.account_id.to_string());
        assert_eq!(claims.role, "client");

        Ok(())
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() -> Result<(), ServiceError> {
        let (service, _, _) = service();
        service.register(register_request("ada@example.com")).await?;

        let unknown = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "difference-engine".to_string(),
            })
            .await;
        let wrong = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "analytical-engine".to_string(),
            })
            .await;

        assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));
        assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));

        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_mails_the_token() -> Result<(), ServiceError> {
        let (service, store, notifier) = service();
        service.register(register_request("ada@example.com")).await?;

        service
            .forgot_password(ForgotPasswordRequest {
                email: "ada@example.com".to_string(),
            })
            .await?;

        let sent = notifier.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_email, "ada@example.com");

        // The mailed body carries the live token.
        let tokens: Vec<&str> = sent[0]
            .body
            .split_whitespace()
            .filter(|w| w.len() == 73 && w.matches('-').count() == 9)
            .collect();
        assert_eq!(tokens.len(), 1);
        assert!(store.find_reset_token(tokens[0]).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_reports_unknown_email() {
        let (service, _, notifier) = service();

        let result = service
            .forgot_password(ForgotPasswordRequest {
                email: "nobody@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound("Account"))));
        assert!(notifier.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn forgot_password_fails_when_delivery_fails() -> Result<(), ServiceError> {
        let store = Arc::new(MemStore::new());
        let notifier = Arc::new(MockNotifier::failing());
        let service = AccountService::new(store, notifier, jwt());
        service.register(register_request("ada@example.com")).await?;

        let result = service
            .forgot_password(ForgotPasswordRequest {
                email: "ada@example.com".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Delivery(_))));

        Ok(())
    }

    #[tokio::test]
    async fn reset_password_is_single_use() -> Result<(), ServiceError> {
        let (service, store, _) = service();
        service.register(register_request("ada@example.com")).await?;

        let token = service.reset_tokens.issue("ada@example.com").await?;
        service
            .reset_password(ResetPasswordRequest {
                token: token.clone(),
                new_password: "jacquard-loom".to_string(),
            })
            .await?;

        // New password works, token is gone.
        assert!(service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "jacquard-loom".to_string(),
            })
            .await
            .is_ok());
        assert!(store.find_reset_token(&token).await?.is_none());

        let again = service
            .reset_password(ResetPasswordRequest {
                token,
                new_password: "babbage".to_string(),
            })
            .await;
        assert!(matches!(again, Err(ServiceError::InvalidResetToken)));

        Ok(())
    }

    #[tokio::test]
    async fn newer_reset_token_invalidates_older() -> Result<(), ServiceError> {
        let (service, _, _) = service();
        service.register(register_request("ada@example.com")).await?;

        let first = service.reset_tokens.issue("ada@example.com").await?;
        let _second = service.reset_tokens.issue("ada@example.com").await?;

        let result = service
            .reset_password(ResetPasswordRequest {
                token: first,
                new_password: "jacquard-loom".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidResetToken)));

        Ok(())
    }

    #[tokio::test]
    async fn change_password_replaces_credential() -> Result<(), ServiceError> {
        let (service, _, _) = service();
        let registered = service.register(register_request("ada@example.com")).await?;

        service
            .change_password(
                registered.account.account_id,
                ChangePasswordRequest {
                    new_password: "jacquard-loom".to_string(),
                },
            )
            .await?;

        assert!(service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "jacquard-loom".to_string(),
            })
            .await
            .is_ok());
        let old = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "difference-engine".to_string(),
            })
            .await;
        assert!(matches!(old, Err(ServiceError::InvalidCredentials)));

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_keeps_role_and_credential() -> Result<(), ServiceError> {
        let (service, store, _) = service();
        let registered = service.register(register_request("ada@example.com")).await?;
        let account_id = registered.account.account_id;
        let before = store
            .find_account_by_id(account_id)
            .await?
            .expect("account should exist");

        let updated = service
            .update_profile(
                account_id,
                UpdateProfileRequest {
                    first_name: "Augusta".to_string(),
                    last_name: "King".to_string(),
                    email: "countess@example.com".to_string(),
                    phone: "555-0101".to_string(),
                    address: "2 Analytical Way".to_string(),
                },
            )
            .await?;
        assert_eq!(updated.email, "countess@example.com");

        let after = store
            .find_account_by_id(account_id)
            .await?
            .expect("account should exist");
        assert_eq!(after.password_hash, before.password_hash);
        assert_eq!(after.role, before.role);

        Ok(())
    }

    #[tokio::test]
    async fn list_users_pages_by_five() -> Result<(), ServiceError> {
        let (service, _, _) = service();
        for i in 0..7 {
            service
                .register(register_request(&format!("user{}@example.com", i)))
                .await?;
        }

        let (page1, total_pages, total) = service.list_users(None, 1).await?;
        assert_eq!(page1.len(), 5);
        assert_eq!(total_pages, 2);
        assert_eq!(total, 7);

        let (page2, _, _) = service.list_users(None, 2).await?;
        assert_eq!(page2.len(), 2);

        // Page values below 1 clamp to the first page.
        let (clamped, _, _) = service.list_users(None, 0).await?;
        assert_eq!(clamped.len(), 5);

        Ok(())
    }
}
