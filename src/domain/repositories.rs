//! Repository traits for the domain layer

use super::booking::BookingRepository;
use super::car::CarRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// Injected into application services instead of a process-wide store, so
/// every operation is callable and testable against any backend:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let car = repos.cars().find_by_id(1).await?;
///     let bookings = repos.bookings().find_for_user("user-1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn cars(&self) -> &dyn CarRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
