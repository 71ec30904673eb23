//! Database entities.

pub mod user;

pub use user::{AccountStatus, Entity as User};
