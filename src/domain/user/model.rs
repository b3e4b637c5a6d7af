//! User domain entity

use chrono::{DateTime, Utc};

/// Registered account that can own bookings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: String,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Hashed password credential (opaque to the core)
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}
