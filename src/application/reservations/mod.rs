//! Reservation use-cases

pub mod service;

pub use service::ReservationService;
