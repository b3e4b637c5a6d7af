//! Booking aggregate
//!
//! Contains the Booking entity, the half-open interval it reserves, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::Booking;
pub use repository::BookingRepository;
