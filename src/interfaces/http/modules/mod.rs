//! HTTP modules, one per resource

pub mod auth;
pub mod bookings;
pub mod cars;
pub mod health;
