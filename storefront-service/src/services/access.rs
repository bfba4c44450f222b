use uuid::Uuid;

use crate::models::Role;
use crate::services::error::ServiceError;
use crate::services::jwt::{Claims, JwtService};

/// Authenticated caller, as established from a verified token.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub account_id: Uuid,
    pub role: Role,
}

impl Identity {
    /// Caller must hold exactly this role.
    pub fn require_role(&self, role: Role) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    /// Caller must own the resource or hold the given role.
    pub fn require_owner_or_role(&self, owner: Uuid, role: Role) -> Result<(), ServiceError> {
        if self.account_id == owner || self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Verify a bearer token and resolve the caller. Any verification failure
/// (missing, malformed, tampered, expired) reads as unauthenticated.
pub fn identify(jwt: &JwtService, token: &str) -> Result<Identity, ServiceError> {
    let claims = jwt
        .validate_token(token)
        .map_err(|_| ServiceError::Unauthenticated)?;
    identity_from_claims(&claims)
}

pub fn identity_from_claims(claims: &Claims) -> Result<Identity, ServiceError> {
    let account_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| ServiceError::Unauthenticated)?;

    Ok(Identity {
        account_id,
        role: Role::from_string(&claims.role),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;

    fn jwt() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "a-test-secret-long-enough-for-hs512".to_string(),
            expiry_hours: 24,
        })
    }

    #[test]
    fn identify_resolves_id_and_role() -> Result<(), anyhow::Error> {
        let jwt = jwt();
        let account_id = Uuid::new_v4();
        let token = jwt.generate_token(account_id, Role::Admin)?;

        let identity = identify(&jwt, &token).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        assert_eq!(identity.account_id, account_id);
        assert_eq!(identity.role, Role::Admin);

        Ok(())
    }

    #[test]
    fn identify_rejects_garbage() {
        assert!(matches!(
            identify(&jwt(), "not.a.token"),
            Err(ServiceError::Unauthenticated)
        ));
    }

    #[test]
    fn role_check_is_exact() {
        let identity = Identity {
            account_id: Uuid::new_v4(),
            role: Role::Client,
        };

        assert!(identity.require_role(Role::Client).is_ok());
        assert!(matches!(
            identity.require_role(Role::Admin),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn owner_or_role_accepts_either() {
        let owner = Uuid::new_v4();
        let client = Identity {
            account_id: owner,
            role: Role::Client,
        };
        let admin = Identity {
            account_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let stranger = Identity {
            account_id: Uuid::new_v4(),
            role: Role::Client,
        };

        assert!(client.require_owner_or_role(owner, Role::Admin).is_ok());
        assert!(admin.require_owner_or_role(owner, Role::Admin).is_ok());
        assert!(matches!(
            stranger.require_owner_or_role(owner, Role::Admin),
            Err(ServiceError::Forbidden)
        ));
    }
}
