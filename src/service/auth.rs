//! Account registration, login and token lifecycle.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;

use crate::domain::{
    AccessTokenResponse, AuthResponse, LoginPayload, RegisterPayload, StringUuid, TokenPair, User,
    UserProfile, UserRole,
};
use crate::error::{AppError, Result};
use crate::jwt::{TokenKind, TokenManager};
use crate::repository::UserRepository;
use crate::validation::{validate_email, ValidatedUser};

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

pub struct AuthService<U> {
    users: Arc<U>,
    tokens: TokenManager,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: Arc<U>, tokens: TokenManager) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse> {
        let ValidatedUser(new_user) = ValidatedUser::from_payload(payload)?;
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::Conflict("email is already registered".into()));
        }

        let user = User {
            id: StringUuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: hash_password(&new_user.password)?,
            role: UserRole::User,
            refresh_token: None,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        self.issue_session(user).await
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse> {
        let email = validate_email(&payload.email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|u| verify_password(&payload.password, &u.password_hash))
            .ok_or_else(|| AppError::Unauthorized("invalid email or password".into()))?;
        self.issue_session(user).await
    }

    /// Exchanges a valid refresh token for a new access token. The
    /// presented token must match the one stored for the user, so a
    /// logout invalidates all previously issued refresh tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessTokenResponse> {
        let user_id = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        let user = self
            .users
            .find_by_id(user_id.into())
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".into()))?;
        if user.refresh_token.as_deref() != Some(refresh_token) {
            return Err(AppError::Unauthorized("refresh token has been revoked".into()));
        }
        let access_token = self.tokens.issue(user_id, TokenKind::Access)?;
        Ok(AccessTokenResponse { access_token })
    }

    pub async fn logout(&self, user_id: StringUuid) -> Result<()> {
        self.users.set_refresh_token(user_id, None).await
    }

    pub async fn me(&self, user_id: StringUuid) -> Result<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    async fn issue_session(&self, user: User) -> Result<AuthResponse> {
        let access_token = self.tokens.issue(user.id.0, TokenKind::Access)?;
        let refresh_token = self.tokens.issue(user.id.0, TokenKind::Refresh)?;
        self.users
            .set_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;
        Ok(AuthResponse {
            user: user.profile(),
            tokens: TokenPair {
                access_token,
                refresh_token,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::repository::user::MockUserRepository;
    use mockall::predicate::eq;

    fn tokens() -> TokenManager {
        TokenManager::new(&JwtConfig {
            secret: "unit-test-secret".into(),
            refresh_secret: None,
            issuer: "bizflow".into(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 604_800,
        })
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: StringUuid::new_v4(),
            name: "Alice".into(),
            email: email.into(),
            password_hash: hash_password(password).unwrap(),
            role: UserRole::User,
            refresh_token: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("taken@example.com"))
            .returning(|_| Ok(Some(stored_user("taken@example.com", "abc123"))));
        let service = AuthService::new(Arc::new(repo), tokens());

        let err = service
            .register(RegisterPayload {
                name: "Bob".into(),
                email: "taken@example.com".into(),
                password: "abc123".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_stores_refresh_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|_| Ok(()));
        repo.expect_set_refresh_token()
            .withf(|_, token| token.is_some())
            .returning(|_, _| Ok(()));
        let service = AuthService::new(Arc::new(repo), tokens());

        let response = service
            .register(RegisterPayload {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                password: "abc123".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "alice@example.com");
        assert!(!response.tokens.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("alice@example.com", "abc123"))));
        let service = AuthService::new(Arc::new(repo), tokens());

        let err = service
            .login(LoginPayload {
                email: "alice@example.com".into(),
                password: "wrong99".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        let service = AuthService::new(Arc::new(repo), tokens());

        let err = service
            .login(LoginPayload {
                email: "ghost@example.com".into(),
                password: "abc123".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_revoked_token() {
        let manager = tokens();
        let mut user = stored_user("alice@example.com", "abc123");
        let token = manager.issue(user.id.0, TokenKind::Refresh).unwrap();
        user.refresh_token = None; // logged out

        let user_id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));
        let service = AuthService::new(Arc::new(repo), manager);

        let err = service.refresh(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_refresh_returns_new_access_token() {
        let manager = tokens();
        let mut user = stored_user("alice@example.com", "abc123");
        let token = manager.issue(user.id.0, TokenKind::Refresh).unwrap();
        user.refresh_token = Some(token.clone());

        let expected_id = user.id.0;
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let service = AuthService::new(Arc::new(repo), manager.clone());

        let response = service.refresh(&token).await.unwrap();
        let subject = manager
            .verify(&response.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(subject, expected_id);
    }
}
