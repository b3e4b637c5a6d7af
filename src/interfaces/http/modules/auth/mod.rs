//! Auth HTTP module

pub mod dto;
pub mod handlers;

pub use handlers::AuthAppState;
