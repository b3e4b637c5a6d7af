//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::car::CarRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::car_repository::SeaOrmCarRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    cars: SeaOrmCarRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            cars: SeaOrmCarRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
