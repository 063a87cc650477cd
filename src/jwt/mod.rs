//! Access and refresh token issuance and verification.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub token_type: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies the two token families. Access and refresh tokens
/// use separate secrets so one cannot stand in for the other even when
/// the type claim is forged.
#[derive(Clone)]
pub struct TokenManager {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenManager {
    pub fn new(config: &JwtConfig) -> Self {
        let refresh_secret = config.refresh_secret();
        TokenManager {
            access_encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    pub fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let (key, ttl) = match kind {
            TokenKind::Access => (&self.access_encoding, self.access_ttl_secs),
            TokenKind::Refresh => (&self.refresh_encoding, self.refresh_ttl_secs),
        };
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            token_type: kind,
            iat: now,
            exp: now + ttl,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, key)?;
        Ok(token)
    }

    /// Verifies signature, expiry, issuer and token kind, and returns
    /// the subject user id.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Uuid> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        let data = decode::<Claims>(token, key, &self.validation())?;
        if data.claims.token_type != kind {
            return Err(AppError::Unauthorized("invalid token type".into()));
        }
        data.claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("invalid token subject".into()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new(&JwtConfig {
            secret: "test-access-secret".into(),
            refresh_secret: Some("test-refresh-secret".into()),
            issuer: "bizflow".into(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 604_800,
        })
    }

    #[test]
    fn test_issue_and_verify_access() {
        let m = manager();
        let user_id = Uuid::new_v4();
        let token = m.issue(user_id, TokenKind::Access).unwrap();
        assert_eq!(m.verify(&token, TokenKind::Access).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let m = manager();
        let token = m.issue(Uuid::new_v4(), TokenKind::Refresh).unwrap();
        assert!(m.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let m = manager();
        let token = m.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        assert!(m.verify(&token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn test_shared_secret_still_rejects_wrong_kind() {
        // No refresh secret configured: both families share one key,
        // so only the token_type claim separates them.
        let m = TokenManager::new(&JwtConfig {
            secret: "only-secret".into(),
            refresh_secret: None,
            issuer: "bizflow".into(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 604_800,
        });
        let token = m.issue(Uuid::new_v4(), TokenKind::Refresh).unwrap();
        assert!(m.verify(&token, TokenKind::Access).is_err());
        assert!(m.verify(&token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_rejects_wrong_issuer() {
        let m = manager();
        let other = TokenManager::new(&JwtConfig {
            secret: "test-access-secret".into(),
            refresh_secret: None,
            issuer: "someone-else".into(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 604_800,
        });
        let token = other.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        assert!(m.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_rejects_expired_access_token() {
        // Negative TTL puts exp in the past, well beyond the 5s leeway.
        let m = TokenManager::new(&JwtConfig {
            secret: "test-access-secret".into(),
            refresh_secret: Some("test-refresh-secret".into()),
            issuer: "bizflow".into(),
            access_token_ttl_secs: -60,
            refresh_token_ttl_secs: 604_800,
        });
        let user_id = Uuid::new_v4();
        let expired = m.issue(user_id, TokenKind::Access).unwrap();
        assert!(m.verify(&expired, TokenKind::Access).is_err());
        // The refresh family is unaffected by the expired access token.
        let refresh = m.issue(user_id, TokenKind::Refresh).unwrap();
        assert!(m.verify(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        let m = manager();
        assert!(m.verify("not.a.jwt", TokenKind::Access).is_err());
    }
}
