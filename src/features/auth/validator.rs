use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
    admin_role: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard claims; iss/aud/exp are checked by jsonwebtoken itself
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
        admin_role: String,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
            admin_role,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        Ok(self.principal_from_claims(claims))
    }

    fn principal_from_claims(&self, claims: Claims) -> AuthenticatedUser {
        let mut user = AuthenticatedUser {
            sub: claims.sub,
            email: claims.email,
            roles: claims.roles,
            is_admin: false,
        };
        user.is_admin = user.has_role(&self.admin_role);
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> JwtValidator {
        JwtValidator::new(
            Arc::new(JwksClient::new(
                "http://localhost/jwks",
                Duration::from_secs(60),
            )),
            "http://localhost".to_string(),
            "pharmacy-api".to_string(),
            Duration::from_secs(0),
            "admin".to_string(),
        )
    }

    #[test]
    fn test_admin_role_sets_admin_flag() {
        let user = validator().principal_from_claims(Claims {
            sub: "u-1".to_string(),
            email: None,
            roles: vec!["user".to_string(), "admin".to_string()],
        });
        assert!(user.is_admin);
        assert!(user.has_role("user"));
    }

    #[test]
    fn test_missing_roles_is_not_admin() {
        let user = validator().principal_from_claims(Claims {
            sub: "u-2".to_string(),
            email: Some("u2@example.com".to_string()),
            roles: Vec::new(),
        });
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        let err = validator().validate_token("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }
}
