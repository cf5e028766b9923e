// src/workload/summary.rs

//! Human-readable output for the binary. Goes to stdout; logs go to stderr.

use tracing::debug;

use crate::config::{TaskKind, WorkloadFile};
use crate::workload::runner::WorkloadReport;

/// Print the pool settings and tasks without running anything.
pub fn print_dry_run(workload: &WorkloadFile) {
    let pool = workload.pool();
    println!("ticketpool dry-run");
    println!("  pool.total_workers = {}", pool.total_workers);
    println!(
        "  pool.high_priority_workers = {} ({} general)",
        pool.high_priority_workers,
        pool.general_workers()
    );
    println!("  pool.high_priority_threshold = {}", pool.high_priority_threshold);
    println!();

    println!("tasks ({}), in submission order:", workload.tasks().len());
    for name in workload.submission_order() {
        let Some(task) = workload.task(name) else {
            continue;
        };
        println!("  - {name}");
        match task.kind() {
            TaskKind::Single => println!("      priority: {}", task.priority),
            TaskKind::Batch => {
                println!("      priority: {}", task.priority);
                println!("      instances: {}", task.instances);
            }
            TaskKind::Barrier => println!("      barrier"),
            TaskKind::Manual => {
                println!("      manual, completed after {} ms", task.complete_after_ms)
            }
        }
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
        if task.work_ms > 0 {
            println!("      work_ms: {}", task.work_ms);
        }
        if task.bump {
            println!("      bump: true");
        }
    }

    debug!("dry-run complete (no execution)");
}

pub fn print_report(report: &WorkloadReport) {
    println!("ticketpool run finished in {:?}", report.elapsed);
    println!("execution order:");
    for (i, entry) in report.execution_order.iter().enumerate() {
        println!("  {i:>4}  {entry}");
    }

    let stats = &report.stats;
    println!();
    println!("submitted:           {}", stats.submitted);
    println!("executed by workers: {}", stats.executed_by_workers);
    println!("executed inline:     {}", stats.executed_inline);
    println!("promoted:            {}", stats.promoted);
    println!("bumped:              {}", stats.bumped);
    println!("panicked:            {}", stats.panicked);
}
