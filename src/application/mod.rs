//! Business logic and use cases

pub mod fleet;
pub mod identity;
pub mod reservations;

pub use fleet::CarService;
pub use identity::{AuthResult, UserService};
pub use reservations::ReservationService;
