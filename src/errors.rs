// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Only construction and loading can fail. Submission and waiting never
//! return errors; misuse there shows up as blocking, not as an `Err`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TicketPoolError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown dependency: task '{task}' is after '{dependency}', which is not defined")]
    UnknownDependency { task: String, dependency: String },

    #[error("Cycle detected in workload: {0}")]
    DagCycle(String),

    #[error("Failed to spawn worker thread {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TicketPoolError>;
