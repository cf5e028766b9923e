// src/config/mod.rs

//! Configuration for pools and for workload files.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a workload file from disk.
//! - [`validate`] turns a raw file into a validated [`WorkloadFile`] and
//!   checks pool worker splits.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_workload_path, load_and_validate, load_from_path, parse_str};
pub use model::{PoolConfig, RawWorkloadFile, TaskKind, TaskSpec, WorkloadFile};
pub use validate::validate_pool_config;
