//! Shared types, errors, and configuration for the JET engine.
//!
//! This crate provides common pieces used by the engine and the CLI:
//! - Amount parsing and tolerance comparison with decimal precision
//! - Calendar date parsing for ledger cells
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
