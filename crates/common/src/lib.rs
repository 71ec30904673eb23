//! Common utilities and shared types for accounts-rs.
//!
//! This crate provides foundational components used across all accounts-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Logging**: `tracing` subscriber setup via [`init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use accounts_common::{AppResult, Config, IdGenerator, init_logging};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     init_logging(&config.logging)?;
//!     let id = IdGenerator::new().generate();
//!     tracing::info!(%id, "Generated ID");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod logging;

pub use config::{Config, DatabaseConfig, LoggingConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use logging::init_logging;
