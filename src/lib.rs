//! # Carshare Service
//!
//! Vehicle reservation service: user accounts, a car fleet, and bookings
//! with overlap-safe reservation windows.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, value types and repository traits
//! - **application**: Use-case services (identity, fleet, reservations)
//! - **infrastructure**: External concerns (SeaORM database, in-memory store, crypto)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStore};

// Re-export API router
pub use interfaces::http::create_api_router;
