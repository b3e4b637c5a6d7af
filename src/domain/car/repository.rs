//! Car repository interface

use async_trait::async_trait;

use super::model::Car;
use crate::domain::DomainResult;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Save a new car. Fails with `Conflict` if the license plate is taken.
    async fn save(&self, car: Car) -> DomainResult<()>;

    /// Find car by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Car>>;

    /// Find car by license plate
    async fn find_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>>;

    /// List all cars
    async fn find_all(&self) -> DomainResult<Vec<Car>>;

    /// Set the availability flag
    async fn set_available(&self, id: i32, available: bool) -> DomainResult<()>;

    /// Generate next car ID
    async fn next_id(&self) -> i32;
}
