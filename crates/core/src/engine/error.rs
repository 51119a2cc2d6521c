//! Engine construction errors.

use thiserror::Error;

/// Errors raised while setting up the engine. A run itself never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A dedicated pool needs at least one worker.
    #[error("worker_threads must be at least 1")]
    InvalidWorkerThreads,

    /// The rayon pool could not be built.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidWorkerThreads => "INVALID_WORKER_THREADS",
            Self::WorkerPool(_) => "WORKER_POOL_ERROR",
        }
    }
}
