//! Error types for Barrido
//!
//! Lifecycle contract breaches are loud and fatal to the current run; the run
//! manager downgrades diagnostic telemetry failures (image grids, graph
//! snapshots, histograms) to warnings on its own, so those never reach here.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Barrido error types
#[derive(Error, Debug)]
pub enum Error {
    /// Lifecycle call made outside its required phase
    #[error("lifecycle violation: {operation} requires the manager to be {expected}, but it is {found}")]
    LifecycleViolation {
        /// Operation that was attempted
        operation: &'static str,
        /// Phase the operation requires
        expected: &'static str,
        /// Phase the manager was actually in
        found: &'static str,
    },

    /// Data source reported zero examples at `begin_run`
    #[error("data source reports a dataset size of zero; epoch means would be undefined")]
    EmptyDataset,

    /// Telemetry sink failure
    #[error("telemetry sink error: {0}")]
    Telemetry(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
