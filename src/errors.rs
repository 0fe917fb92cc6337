// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagschedError {
    #[error("Task ID already exists: {0}")]
    DuplicateTaskId(String),

    #[error("Unknown task ID: {0}")]
    UnknownTaskId(String),

    #[error("Dependency already exists: {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("Cycle detected: {0}")]
    CycleDetected(String),

    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    #[error("Invalid worker count: {0} (must be >= 1)")]
    InvalidWorkerCount(usize),

    #[error("Failed to start scheduler: {0}")]
    StartFailure(String),

    #[error("Task graph is in use by a running scheduler; stop it first")]
    GraphBusy,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::collections::TryReserveError> for DagschedError {
    fn from(err: std::collections::TryReserveError) -> Self {
        DagschedError::AllocationFailure(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagschedError>;
