//! Car domain entity

use chrono::{DateTime, Utc};

/// Fleet vehicle available for booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    /// Unique car ID
    pub id: i32,
    /// Manufacturer, e.g. "Volkswagen"
    pub brand: String,
    /// Model name, e.g. "Golf"
    pub model: String,
    /// Unique license plate
    pub license_plate: String,
    /// Availability flag. Set back to true when a booking is cancelled.
    /// The authoritative signal for a given window is the overlap query
    /// against live bookings, not this flag.
    pub available: bool,
    /// When the car was registered
    pub created_at: DateTime<Utc>,
}

impl Car {
    pub fn new(
        id: i32,
        brand: impl Into<String>,
        model: impl Into<String>,
        license_plate: impl Into<String>,
    ) -> Self {
        Self {
            id,
            brand: brand.into(),
            model: model.into(),
            license_plate: license_plate.into(),
            available: true,
            created_at: Utc::now(),
        }
    }

    /// Display label, e.g. "Volkswagen Golf - B-CS 1234"
    pub fn label(&self) -> String {
        format!("{} {} - {}", self.brand, self.model, self.license_plate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_car_is_available() {
        let car = Car::new(1, "Volkswagen", "Golf", "B-CS 1234");
        assert!(car.available);
        assert_eq!(car.label(), "Volkswagen Golf - B-CS 1234");
    }
}
