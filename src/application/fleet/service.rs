//! Fleet management — car registration and listing

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{Car, DomainError, DomainResult, RepositoryProvider};

/// Car service — register and query fleet vehicles.
pub struct CarService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CarService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Register a new car. License plates are unique across the fleet.
    pub async fn register_car(
        &self,
        brand: &str,
        model: &str,
        license_plate: &str,
    ) -> DomainResult<Car> {
        if brand.trim().is_empty() || model.trim().is_empty() || license_plate.trim().is_empty() {
            return Err(DomainError::Validation(
                "brand, model and license_plate must not be empty".to_string(),
            ));
        }

        if self
            .repos
            .cars()
            .find_by_license_plate(license_plate)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "license plate '{}' already registered",
                license_plate
            )));
        }

        let id = self.repos.cars().next_id().await;
        let car = Car::new(id, brand, model, license_plate);
        self.repos.cars().save(car.clone()).await?;

        info!(car_id = id, license_plate, "Car registered");
        Ok(car)
    }

    /// Fetch a single car.
    pub async fn get_car(&self, id: i32) -> DomainResult<Car> {
        self.repos
            .cars()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", "id", id))
    }

    /// List the whole fleet.
    pub async fn list_cars(&self) -> DomainResult<Vec<Car>> {
        self.repos.cars().find_all().await
    }

    /// Cars with no live booking covering the current instant.
    ///
    /// Derived from the booking set rather than the stored `available` flag;
    /// the flag only tracks cancellations and is not cleared on create.
    pub async fn list_free_now(&self) -> DomainResult<Vec<Car>> {
        let now = Utc::now();
        let bookings = self.repos.bookings().find_all().await?;
        let busy: std::collections::HashSet<i32> = bookings
            .iter()
            .filter(|b| b.period.contains(now))
            .map(|b| b.car_id)
            .collect();

        let cars = self.repos.cars().find_all().await?;
        Ok(cars.into_iter().filter(|c| !busy.contains(&c.id)).collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingPeriod, Booking, BookingRepository, User, UserRepository};
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::Duration;

    async fn setup() -> (Arc<InMemoryStore>, CarService) {
        let store = Arc::new(InMemoryStore::new());
        let service = CarService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn register_and_list() {
        let (_store, service) = setup().await;
        let golf = service.register_car("Volkswagen", "Golf", "B-CS 1234").await.unwrap();
        let corsa = service.register_car("Opel", "Corsa", "B-CS 5678").await.unwrap();
        assert_ne!(golf.id, corsa.id);

        let cars = service.list_cars().await.unwrap();
        assert_eq!(cars.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_plate_conflicts() {
        let (_store, service) = setup().await;
        service.register_car("Volkswagen", "Golf", "B-CS 1234").await.unwrap();
        let err = service
            .register_car("Opel", "Corsa", "B-CS 1234")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn empty_fields_rejected() {
        let (_store, service) = setup().await;
        let err = service.register_car(" ", "Golf", "B-CS 1").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn get_car_not_found() {
        let (_store, service) = setup().await;
        let err = service.get_car(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Car", .. }));
    }

    #[tokio::test]
    async fn list_free_now_derives_from_bookings() {
        let (store, service) = setup().await;
        let golf = service.register_car("Volkswagen", "Golf", "B-CS 1234").await.unwrap();
        let corsa = service.register_car("Opel", "Corsa", "B-CS 5678").await.unwrap();

        let user = User::new("alice", "alice@example.com", "hash");
        let user_id = user.id.clone();
        UserRepository::save(store.as_ref(), user).await.unwrap();

        // Golf is booked over a window covering now; Corsa is not.
        let now = Utc::now();
        let period = BookingPeriod::new(now - Duration::hours(1), now + Duration::hours(1)).unwrap();
        BookingRepository::insert(store.as_ref(), Booking::new(1, user_id, golf.id, period))
            .await
            .unwrap();

        let free: Vec<i32> = service
            .list_free_now()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(free, vec![corsa.id]);
    }
}
