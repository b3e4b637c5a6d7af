//! Core business entities, value types and repository traits

pub mod booking;
pub mod car;
pub mod error;
pub mod period;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingRepository};
pub use car::{Car, CarRepository};
pub use error::{DomainError, DomainResult};
pub use period::BookingPeriod;
pub use repositories::RepositoryProvider;
pub use user::{User, UserRepository};
