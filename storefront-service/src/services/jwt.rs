use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::Role;

/// JWT service for token generation and validation. Tokens are stateless:
/// verification checks only the signature and the expiry claim, so a token
/// stays valid for its full lifetime even after the account changes.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Role code captured at issuance
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiry_hours: config.expiry_hours,
        }
    }

    /// Generate a signed token carrying the account id and role.
    pub fn generate_token(&self, account_id: Uuid, role: Role) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiry_hours);

        let claims = Claims {
            sub: account_id.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let header = Header::new(Algorithm::HS512);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))?;

        Ok(token)
    }

    /// Validate signature and expiry, and decode the claims. Malformed,
    /// tampered and expired tokens all fail the same way.
    pub fn validate_token(&self, token: &str) -> Result<Claims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "a-test-secret-long-enough-for-hs512".to_string(),
            expiry_hours: 24,
        })
    }

    #[test]
    fn token_roundtrip_preserves_claims() -> Result<(), anyhow::Error> {
        let service = test_service();
        let account_id = Uuid::new_v4();

        let token = service.generate_token(account_id, Role::Admin)?;
        assert!(!token.is_empty());

        let claims = service.validate_token(&token)?;
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);

        Ok(())
    }

    #[test]
    fn tampered_token_is_rejected() -> Result<(), anyhow::Error> {
        let service = test_service();
        let token = service.generate_token(Uuid::new_v4(), Role::Client)?;

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> Result<(), anyhow::Error> {
        let service = test_service();
        let other = JwtService::new(&JwtConfig {
            secret: "a-different-secret-also-long-enough".to_string(),
            expiry_hours: 24,
        });

        let token = other.generate_token(Uuid::new_v4(), Role::Client)?;
        assert!(service.validate_token(&token).is_err());

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> Result<(), anyhow::Error> {
        let service = JwtService::new(&JwtConfig {
            secret: "a-test-secret-long-enough-for-hs512".to_string(),
            expiry_hours: -1,
        });

        let token = service.generate_token(Uuid::new_v4(), Role::Client)?;
        assert!(test_service().validate_token(&token).is_err());

        Ok(())
    }
}
