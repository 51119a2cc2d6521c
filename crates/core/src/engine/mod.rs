//! Run orchestration.
//!
//! - `request` - inputs of one run
//! - `runner` - rule scheduling on rayon, panic isolation
//! - `report` - result aggregation and the validation caveat
//! - `error` - engine construction errors

pub mod error;
pub mod report;
pub mod request;
pub mod runner;

pub use error::EngineError;
pub use report::{RunReport, StatusCounts, VALIDATION_CAVEAT};
pub use request::RunRequest;
pub use runner::{EngineOptions, JetEngine};
