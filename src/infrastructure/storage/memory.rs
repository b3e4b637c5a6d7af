//! In-memory repository provider for development and testing

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    Booking, BookingPeriod, BookingRepository, Car, CarRepository, DomainError, DomainResult,
    RepositoryProvider, User, UserRepository,
};

/// In-memory store backing all three repositories.
///
/// Booking mutations (check-then-insert, cancel) are serialized behind a
/// single write lock, which gives the same guarantee the database store gets
/// from a serializable transaction: two concurrent creates for the same car
/// and overlapping windows cannot both commit.
pub struct InMemoryStore {
    users: DashMap<String, User>,
    cars: DashMap<i32, Car>,
    bookings: DashMap<i32, Booking>,
    car_counter: AtomicI32,
    booking_counter: AtomicI32,
    booking_write_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            cars: DashMap::new(),
            bookings: DashMap::new(),
            car_counter: AtomicI32::new(1),
            booking_counter: AtomicI32::new(1),
            booking_write_lock: Mutex::new(()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStore {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn cars(&self) -> &dyn CarRepository {
        self
    }

    fn bookings(&self) -> &dyn BookingRepository {
        self
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: User) -> DomainResult<()> {
        let taken = self
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(DomainError::Conflict(format!(
                "username '{}' or email '{}' already registered",
                user.username, user.email
            )));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }
}

// ── CarRepository impl ──────────────────────────────────────────

#[async_trait]
impl CarRepository for InMemoryStore {
    async fn save(&self, car: Car) -> DomainResult<()> {
        let taken = self
            .cars
            .iter()
            .any(|c| c.license_plate == car.license_plate);
        if taken {
            return Err(DomainError::Conflict(format!(
                "license plate '{}' already registered",
                car.license_plate
            )));
        }
        self.cars.insert(car.id, car);
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Car>> {
        Ok(self.cars.get(&id).map(|c| c.clone()))
    }

    async fn find_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>> {
        Ok(self
            .cars
            .iter()
            .find(|c| c.license_plate == plate)
            .map(|c| c.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Car>> {
        let mut cars: Vec<Car> = self.cars.iter().map(|c| c.clone()).collect();
        cars.sort_by_key(|c| c.id);
        Ok(cars)
    }

    async fn set_available(&self, id: i32, available: bool) -> DomainResult<()> {
        let Some(mut car) = self.cars.get_mut(&id) else {
            return Err(DomainError::not_found("Car", "id", id));
        };
        car.available = available;
        Ok(())
    }

    async fn next_id(&self) -> i32 {
        self.car_counter.fetch_add(1, Ordering::SeqCst)
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert(&self, booking: Booking) -> DomainResult<()> {
        let _guard = self
            .booking_write_lock
            .lock()
            .map_err(|e| DomainError::Storage(format!("booking lock poisoned: {}", e)))?;

        let clash = self
            .bookings
            .iter()
            .any(|b| b.conflicts_with(booking.car_id, &booking.period));
        if clash {
            return Err(DomainError::Conflict(format!(
                "car {} already booked in {}",
                booking.car_id, booking.period
            )));
        }
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self.bookings.iter().map(|b| b.clone()).collect();
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.clone())
            .collect();
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn find_overlapping(
        &self,
        car_id: i32,
        period: &BookingPeriod,
    ) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.conflicts_with(car_id, period))
            .map(|b| b.clone())
            .collect();
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn cancel(&self, id: i32) -> DomainResult<()> {
        let _guard = self
            .booking_write_lock
            .lock()
            .map_err(|e| DomainError::Storage(format!("booking lock poisoned: {}", e)))?;

        let Some(booking) = self.bookings.get(&id).map(|b| b.clone()) else {
            return Err(DomainError::not_found("Booking", "id", id));
        };

        // Both effects or neither: bail out before mutating anything if the
        // car row cannot be updated.
        {
            let Some(mut car) = self.cars.get_mut(&booking.car_id) else {
                return Err(DomainError::Storage(format!(
                    "car {} referenced by booking {} is missing",
                    booking.car_id, id
                )));
            };
            car.available = true;
        }
        self.bookings.remove(&id);
        Ok(())
    }

    async fn next_id(&self) -> i32 {
        self.booking_counter.fetch_add(1, Ordering::SeqCst)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn period(start_hour: u32, end_hour: u32) -> BookingPeriod {
        BookingPeriod::new(
            Utc.with_ymd_and_hms(2025, 1, 1, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, end_hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_overlap() {
        let store = InMemoryStore::new();
        store.cars.insert(1, Car::new(1, "VW", "Golf", "B-CS 1"));

        BookingRepository::insert(&store, Booking::new(1, "u1", 1, period(10, 12)))
            .await
            .unwrap();
        let err = BookingRepository::insert(&store, Booking::new(2, "u2", 1, period(11, 13)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(BookingRepository::find_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_allows_touching_windows() {
        let store = InMemoryStore::new();
        store.cars.insert(1, Car::new(1, "VW", "Golf", "B-CS 1"));

        BookingRepository::insert(&store, Booking::new(1, "u1", 1, period(9, 10)))
            .await
            .unwrap();
        BookingRepository::insert(&store, Booking::new(2, "u2", 1, period(10, 11)))
            .await
            .unwrap();
        assert_eq!(BookingRepository::find_all(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cancel_flips_flag_and_deletes() {
        let store = InMemoryStore::new();
        let mut car = Car::new(1, "VW", "Golf", "B-CS 1");
        car.available = false;
        store.cars.insert(1, car);

        BookingRepository::insert(&store, Booking::new(1, "u1", 1, period(10, 12)))
            .await
            .unwrap();
        BookingRepository::cancel(&store, 1).await.unwrap();

        assert!(BookingRepository::find_by_id(&store, 1)
            .await
            .unwrap()
            .is_none());
        assert!(CarRepository::find_by_id(&store, 1)
            .await
            .unwrap()
            .unwrap()
            .available);
    }

    #[tokio::test]
    async fn cancel_applies_neither_effect_on_failure() {
        let store = InMemoryStore::new();
        // Booking referencing a car row that cannot be updated: the cancel
        // must fail without deleting the booking.
        BookingRepository::insert(&store, Booking::new(1, "u1", 99, period(10, 12)))
            .await
            .unwrap();

        let err = BookingRepository::cancel(&store, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert!(BookingRepository::find_by_id(&store, 1)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn user_uniqueness_enforced() {
        let store = InMemoryStore::new();
        UserRepository::save(&store, User::new("alice", "alice@example.com", "h"))
            .await
            .unwrap();
        let err = UserRepository::save(&store, User::new("alice", "other@example.com", "h"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
