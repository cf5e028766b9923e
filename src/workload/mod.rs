// src/workload/mod.rs

//! Synthetic workloads described in TOML, used by the `ticketpool` binary
//! to exercise a pool end to end.
//!
//! - [`runner`] submits a validated [`WorkloadFile`](crate::config::WorkloadFile)
//!   and drains it.
//! - [`summary`] renders dry-run and report output.

pub mod runner;
pub mod summary;

pub use runner::{WorkloadReport, run_on_pool, run_workload};
pub use summary::{print_dry_run, print_report};
