//! Core business logic for accounts-rs.

pub mod services;

pub use services::*;
