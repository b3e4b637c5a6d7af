//! HTTP interface layer
//!
//! REST API built on axum with Swagger documentation. Modules under
//! `modules/` each own the DTOs and handlers for one resource.

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
