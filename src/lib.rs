// src/lib.rs

//! Dependency-aware, priority-ordered worker pool.
//!
//! Work is submitted to a [`TicketPool`] and identified by a [`Ticket`].
//! Tasks can depend on other tickets, batches share one ticket, barriers
//! fan several tickets into one, and manual tickets bridge completion events
//! from outside the pool. [`Ticket::wait`] helps execute pending work on the
//! calling thread, so waiting from inside a task does not deadlock the pool.
//!
//! ```no_run
//! use ticketpool::TicketPool;
//!
//! let pool = TicketPool::new(4, 1, 100)?;
//! let decode = pool.submit(|| println!("decode"), 0, &[]);
//! let upload = pool.submit(|| println!("upload"), 5, &[decode.clone()]);
//! let frame = pool.submit_barrier(&[decode, upload]);
//! frame.wait();
//! # Ok::<(), ticketpool::errors::TicketPoolError>(())
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod workload;

pub use config::PoolConfig;
pub use engine::{PoolStats, Ticket, TicketPool};
pub use types::{Job, Priority, TicketId};

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::workload::{print_dry_run, print_report, run_workload};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workload loading and validation
/// - the optional `--workers` override
/// - pool start-up, the workload run, and the report
pub fn run(args: CliArgs) -> Result<()> {
    let path = &args.workload;
    let mut workload = load_and_validate(path)?;

    if let Some(workers) = args.workers {
        workload = workload.with_total_workers(workers)?;
    }

    if args.dry_run {
        print_dry_run(&workload);
        return Ok(());
    }

    info!(path = ?path, tasks = workload.tasks().len(), "running workload");
    let report = run_workload(&workload)?;
    print_report(&report);
    Ok(())
}
