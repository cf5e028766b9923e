// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_workload_path;

/// Command-line arguments for `ticketpool`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ticketpool",
    version,
    about = "Run a TOML-described task graph on a dependency-aware worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workload file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_workload_path())]
    pub workload: PathBuf,

    /// Override `[pool].total_workers`.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TICKETPOOL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task graph, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["ticketpool"]).unwrap();
        assert_eq!(args.workload, PathBuf::from("Workload.toml"));
        assert!(args.workers.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn overrides() {
        let args = CliArgs::try_parse_from([
            "ticketpool",
            "--workload",
            "graphs/frame.toml",
            "--workers",
            "6",
            "--log-level",
            "debug",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.workload, PathBuf::from("graphs/frame.toml"));
        assert_eq!(args.workers, Some(6));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.dry_run);
    }
}
