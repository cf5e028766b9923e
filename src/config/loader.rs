// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawWorkloadFile, WorkloadFile};
use crate::errors::Result;

/// Load a workload file from a given path and return the raw
/// `RawWorkloadFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkloadFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let raw = parse_str(&contents)?;
    debug!(path = ?path, tasks = raw.task.len(), "workload file parsed");
    Ok(raw)
}

/// Parse workload TOML from memory.
pub fn parse_str(contents: &str) -> Result<RawWorkloadFile> {
    Ok(toml::from_str(contents)?)
}

/// Load a workload file and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - unknown or self-referencing `after` entries,
///   - dependency cycles,
///   - the `[pool]` worker split,
///   - barrier/manual consistency.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkloadFile> {
    let raw = load_from_path(&path)?;
    WorkloadFile::try_from(raw)
}

/// Workload file used when `--workload` is not given.
pub fn default_workload_path() -> PathBuf {
    PathBuf::from("Workload.toml")
}
