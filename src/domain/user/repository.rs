//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a new user. Fails with `Conflict` if username or email is taken.
    async fn save(&self, user: User) -> DomainResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}
