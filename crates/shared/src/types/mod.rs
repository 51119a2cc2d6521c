//! Common types used across the engine.

pub mod amount;
pub mod date;

pub use amount::{Tolerance, parse_amount};
pub use date::parse_date;
