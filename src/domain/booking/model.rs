//! Booking domain entity

use chrono::{DateTime, Utc};

use crate::domain::period::BookingPeriod;

/// Reservation of one car by one user for a half-open time interval.
///
/// A booking is live while its record exists in the store; cancellation
/// removes it (hard delete). There are no intermediate states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Unique booking ID
    pub id: i32,
    /// Owning user
    pub user_id: String,
    /// Booked car
    pub car_id: i32,
    /// Reserved interval `[start, end)`
    pub period: BookingPeriod,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(id: i32, user_id: impl Into<String>, car_id: i32, period: BookingPeriod) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            car_id,
            period,
            created_at: Utc::now(),
        }
    }

    /// Whether this booking belongs to the given user
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Whether this booking conflicts with a proposed window on the same car
    pub fn conflicts_with(&self, car_id: i32, period: &BookingPeriod) -> bool {
        self.car_id == car_id && self.period.overlaps(period)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn period(start_hour: u32, end_hour: u32) -> BookingPeriod {
        BookingPeriod::new(
            Utc.with_ymd_and_hms(2025, 1, 1, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, end_hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn ownership_check() {
        let b = Booking::new(1, "user-1", 7, period(10, 12));
        assert!(b.is_owned_by("user-1"));
        assert!(!b.is_owned_by("user-2"));
    }

    #[test]
    fn conflict_requires_same_car() {
        let b = Booking::new(1, "user-1", 7, period(10, 12));
        assert!(b.conflicts_with(7, &period(11, 13)));
        assert!(!b.conflicts_with(8, &period(11, 13)));
    }

    #[test]
    fn no_conflict_for_touching_windows() {
        let b = Booking::new(1, "user-1", 7, period(9, 10));
        assert!(!b.conflicts_with(7, &period(10, 11)));
    }
}
