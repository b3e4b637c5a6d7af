//! Car DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Car;

/// Request to register a new car
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(min = 1, max = 20))]
    pub license_plate: String,
}

/// Car details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct CarDto {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Car> for CarDto {
    fn from(c: Car) -> Self {
        Self {
            id: c.id,
            brand: c.brand,
            model: c.model,
            license_plate: c.license_plate,
            available: c.available,
            created_at: c.created_at,
        }
    }
}

/// Request to check a car's availability over a window
#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    /// Window start (ISO 8601)
    pub start_date: String,
    /// Window end (ISO 8601, exclusive)
    pub end_date: String,
}

/// Availability check result
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
}
