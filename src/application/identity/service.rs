//! Identity — registration and login
//!
//! All user-related business logic lives here. HTTP handlers are thin
//! wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// User service — registration, login and account lookup.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    /// Register a new account.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> DomainResult<User> {
        if username.len() < 3 || username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        if self.repos.users().find_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if self.repos.users().find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        let user = User::new(username, email, password_hash);
        self.repos.users().save(user.clone()).await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Authenticate by username or email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let user = match self.repos.users().find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.repos.users().find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.username, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Get a single user by ID.
    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::storage::InMemoryStore;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "carshare-test".to_string(),
        }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryStore::new()), test_jwt_config())
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let service = service();
        let user = service
            .register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();

        let auth = service.login("alice", "s3cret-pass").await.unwrap();
        assert_eq!(auth.user.id, user.id);
        assert_eq!(auth.token_type, "Bearer");

        let claims = verify_token(&auth.token, &test_jwt_config()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
    }

    #[tokio::test]
    async fn login_by_email_works() {
        let service = service();
        service
            .register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();
        assert!(service.login("alice@example.com", "s3cret-pass").await.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let service = service();
        service
            .register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();
        let err = service.login("alice", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let service = service();
        let err = service.login("nobody", "whatever-pass").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let service = service();
        service
            .register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();
        let err = service
            .register("alice", "other@example.com", "s3cret-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let service = service();
        service
            .register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();
        let err = service
            .register("alice2", "alice@example.com", "s3cret-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let service = service();
        assert!(matches!(
            service.register("al", "a@b.c", "longenough").await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            service.register("alice", "a@b.c", "short").await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            service.register("alice", "not-an-email", "longenough").await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
