//! Booking repository interface

use async_trait::async_trait;

use super::model::Booking;
use crate::domain::period::BookingPeriod;
use crate::domain::DomainResult;

/// Persistence interface for bookings.
///
/// The two mutating operations carry the consistency guarantees:
///
/// - `insert` re-runs the overlap check and writes the row within one
///   transactional scope, so two concurrent creates for the same car and
///   overlapping windows cannot both commit.
/// - `cancel` flips the car's availability flag and deletes the booking as
///   one atomic unit; partial application is never observable.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking if its window is free on the car.
    /// Fails with `Conflict` if a live booking overlaps the window.
    async fn insert(&self, booking: Booking) -> DomainResult<()>;

    /// Find booking by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// List all bookings, in insertion (id) order
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;

    /// List bookings owned by a user, in insertion (id) order
    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>>;

    /// Live bookings on a car whose interval overlaps the given window
    async fn find_overlapping(
        &self,
        car_id: i32,
        period: &BookingPeriod,
    ) -> DomainResult<Vec<Booking>>;

    /// Delete the booking and set its car's `available` flag to true,
    /// atomically. Fails with `NotFound` if the booking does not exist.
    async fn cancel(&self, id: i32) -> DomainResult<()>;

    /// Generate next booking ID
    async fn next_id(&self) -> i32;
}
