//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Booking;

/// Request to create a new booking
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Car to reserve
    pub car_id: i32,
    /// Reservation start (ISO 8601)
    pub start_date: String,
    /// Reservation end (ISO 8601, exclusive)
    pub end_date: String,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub user_id: String,
    pub car_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            car_id: b.car_id,
            start_date: b.period.start(),
            end_date: b.period.end(),
            created_at: b.created_at,
        }
    }
}

/// List bookings query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsParams {
    /// Restrict to bookings owned by this user
    pub user_id: Option<String>,
}

/// Response from cancelling a booking
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelBookingResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookingPeriod;
    use chrono::TimeZone;

    #[test]
    fn booking_dto_flattens_period() {
        let period = BookingPeriod::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        )
        .unwrap();
        let dto = BookingDto::from(Booking::new(7, "user-1", 3, period));

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["car_id"], 3);
        assert_eq!(json["start_date"], "2025-01-01T10:00:00Z");
        assert_eq!(json["end_date"], "2025-01-01T12:00:00Z");
    }
}
