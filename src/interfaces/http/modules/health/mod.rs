//! Health HTTP module

pub mod handlers;
