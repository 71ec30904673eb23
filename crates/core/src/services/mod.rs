//! Business logic services.

#![allow(missing_docs)]

pub mod account_status;

pub use account_status::{AccountStatusService, CreateAccountInput, StatusChange};
