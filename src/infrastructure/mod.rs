//! External concerns: persistence backends and crypto

pub mod crypto;
pub mod database;
pub mod storage;

pub use database::{init_database, DatabaseConfig};
pub use storage::InMemoryStore;
