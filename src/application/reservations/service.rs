//! Reservation management — application-layer orchestration
//!
//! Owns the booking/car consistency rules: no car is double-booked, and a
//! cancellation releases the car again. HTTP handlers are thin wrappers that
//! delegate here, so every operation is callable and testable without any
//! transport layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{Booking, BookingPeriod, DomainError, DomainResult, RepositoryProvider};

/// Reservation service — create, fetch, list and cancel bookings.
pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a booking for a car over `[start, end)`.
    ///
    /// Fails with `Validation` if the interval is inverted or empty, with
    /// `NotFound` if user or car do not exist, and with `Conflict` if a live
    /// booking on the car overlaps the window. The overlap check and the
    /// insert are one atomic unit in the store, so concurrent overlapping
    /// creates cannot both succeed.
    ///
    /// The car's `available` flag is not touched here; availability for a
    /// window is answered by [`check_availability`](Self::check_availability).
    pub async fn create_booking(
        &self,
        user_id: &str,
        car_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Booking> {
        let period = BookingPeriod::new(start, end)?;

        if self.repos.users().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", "id", user_id));
        }
        if self.repos.cars().find_by_id(car_id).await?.is_none() {
            return Err(DomainError::not_found("Car", "id", car_id));
        }

        let id = self.repos.bookings().next_id().await;
        let booking = Booking::new(id, user_id, car_id, period);
        self.repos.bookings().insert(booking.clone()).await?;

        info!(booking_id = id, car_id, user_id, "Booking created");
        Ok(booking)
    }

    /// Fetch a single booking.
    pub async fn get_booking(&self, id: i32) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", id))
    }

    /// List bookings, optionally restricted to one user. Insertion order.
    pub async fn list_bookings(&self, user_id: Option<&str>) -> DomainResult<Vec<Booking>> {
        match user_id {
            Some(user_id) => self.repos.bookings().find_for_user(user_id).await,
            None => self.repos.bookings().find_all().await,
        }
    }

    /// Cancel a booking on behalf of `requesting_user_id`.
    ///
    /// Only the owner may cancel. On success the booking is deleted and the
    /// car's `available` flag is set back to true, atomically.
    pub async fn cancel_booking(&self, id: i32, requesting_user_id: &str) -> DomainResult<()> {
        let booking = self.get_booking(id).await?;

        if !booking.is_owned_by(requesting_user_id) {
            return Err(DomainError::Forbidden(
                "only the booking owner can cancel it".to_string(),
            ));
        }

        self.repos.bookings().cancel(id).await?;
        info!(booking_id = id, car_id = booking.car_id, "Booking cancelled");
        Ok(())
    }

    /// Whether the car is free over `[start, end)`. Pure read, same overlap
    /// predicate as `create_booking`, no writes.
    pub async fn check_availability(
        &self,
        car_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let period = BookingPeriod::new(start, end)?;
        let clashes = self.repos.bookings().find_overlapping(car_id, &period).await?;
        Ok(clashes.is_empty())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Car, CarRepository, User, UserRepository};
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    async fn setup() -> (Arc<InMemoryStore>, ReservationService, String, String) {
        let store = Arc::new(InMemoryStore::new());

        let alice = User::new("alice", "alice@example.com", "hash");
        let bob = User::new("bob", "bob@example.com", "hash");
        let alice_id = alice.id.clone();
        let bob_id = bob.id.clone();
        UserRepository::save(store.as_ref(), alice).await.unwrap();
        UserRepository::save(store.as_ref(), bob).await.unwrap();

        CarRepository::save(store.as_ref(), Car::new(1, "Volkswagen", "Golf", "B-CS 1234"))
            .await
            .unwrap();
        CarRepository::save(store.as_ref(), Car::new(2, "Opel", "Corsa", "B-CS 5678"))
            .await
            .unwrap();

        let service = ReservationService::new(store.clone());
        (store, service, alice_id, bob_id)
    }

    #[tokio::test]
    async fn create_booking_succeeds_for_free_window() {
        let (_store, service, alice, _) = setup().await;
        let booking = service
            .create_booking(&alice, 1, at(10), at(12))
            .await
            .unwrap();
        assert_eq!(booking.car_id, 1);
        assert!(booking.is_owned_by(&alice));
    }

    #[tokio::test]
    async fn create_booking_rejects_inverted_interval() {
        let (_store, service, alice, _) = setup().await;
        let err = service
            .create_booking(&alice, 1, at(12), at(10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_booking_rejects_unknown_user_and_car() {
        let (_store, service, alice, _) = setup().await;
        let err = service
            .create_booking("no-such-user", 1, at(10), at(12))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));

        let err = service
            .create_booking(&alice, 99, at(10), at(12))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Car", .. }));
    }

    #[tokio::test]
    async fn overlapping_booking_conflicts() {
        let (_store, service, alice, bob) = setup().await;
        service.create_booking(&alice, 1, at(10), at(12)).await.unwrap();

        let err = service
            .create_booking(&bob, 1, at(11), at(13))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Same window on a different car is fine.
        service.create_booking(&bob, 2, at(11), at(13)).await.unwrap();
    }

    #[tokio::test]
    async fn touching_windows_do_not_conflict() {
        let (_store, service, alice, bob) = setup().await;
        service.create_booking(&alice, 1, at(9), at(10)).await.unwrap();
        service.create_booking(&bob, 1, at(10), at(11)).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_overlapping_creates_admit_at_most_one() {
        let (store, _, alice, bob) = setup().await;

        let mut handles = Vec::new();
        for user in [alice, bob] {
            let repos: Arc<InMemoryStore> = store.clone();
            handles.push(tokio::spawn(async move {
                ReservationService::new(repos)
                    .create_booking(&user, 1, at(10), at(12))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.bookings().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_booking_not_found() {
        let (_store, service, _, _) = setup().await;
        let err = service.get_booking(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Booking", .. }));
    }

    #[tokio::test]
    async fn list_bookings_filters_by_owner() {
        let (_store, service, alice, bob) = setup().await;
        service.create_booking(&alice, 1, at(8), at(9)).await.unwrap();
        service.create_booking(&bob, 1, at(9), at(10)).await.unwrap();
        service.create_booking(&alice, 2, at(8), at(9)).await.unwrap();

        let all = service.list_bookings(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let alices = service.list_bookings(Some(&alice)).await.unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|b| b.is_owned_by(&alice)));
    }

    #[tokio::test]
    async fn cancel_by_non_owner_is_forbidden_and_changes_nothing() {
        let (store, service, alice, bob) = setup().await;
        let booking = service.create_booking(&alice, 1, at(10), at(12)).await.unwrap();

        let err = service.cancel_booking(booking.id, &bob).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        assert!(service.get_booking(booking.id).await.is_ok());
        // New cars start available; the failed cancel must not have touched
        // the flag either way.
        let car = store.cars().find_by_id(1).await.unwrap().unwrap();
        assert!(car.available);
    }

    #[tokio::test]
    async fn cancel_by_owner_deletes_and_releases_car() {
        let (store, service, alice, _) = setup().await;
        store.cars().set_available(1, false).await.unwrap();
        let booking = service.create_booking(&alice, 1, at(10), at(12)).await.unwrap();

        service.cancel_booking(booking.id, &alice).await.unwrap();

        let err = service.get_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        let car = store.cars().find_by_id(1).await.unwrap().unwrap();
        assert!(car.available);
    }

    #[tokio::test]
    async fn check_availability_matches_create_predicate() {
        let (_store, service, alice, _) = setup().await;
        service.create_booking(&alice, 1, at(10), at(12)).await.unwrap();

        assert!(!service.check_availability(1, at(11), at(13)).await.unwrap());
        assert!(service.check_availability(1, at(12), at(13)).await.unwrap());
        assert!(service.check_availability(2, at(11), at(13)).await.unwrap());
    }
}
