//! Fleet use-cases

pub mod service;

pub use service::CarService;
