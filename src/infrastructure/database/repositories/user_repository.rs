//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("database error: {}", e))
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn save(&self, u: User) -> DomainResult<()> {
        debug!("Saving user: {}", u.username);

        let taken = user::Entity::find()
            .filter(
                user::Column::Username
                    .eq(u.username.clone())
                    .or(user::Column::Email.eq(u.email.clone())),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if taken.is_some() {
            return Err(DomainError::Conflict(format!(
                "username '{}' or email '{}' already registered",
                u.username, u.email
            )));
        }

        let model = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            created_at: Set(u.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }
}
