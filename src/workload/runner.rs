// src/workload/runner.rs

//! Submit a validated workload to a pool and drain it.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::{TaskKind, TaskSpec, WorkloadFile};
use crate::engine::{PoolStats, Ticket, TicketPool};
use crate::errors::Result;

/// What happened during a workload run.
#[derive(Debug, Clone)]
pub struct WorkloadReport {
    /// Executed task instances in completion order. Batch instances are
    /// reported as `name#index`.
    pub execution_order: Vec<String>,
    pub stats: PoolStats,
    pub elapsed: Duration,
}

impl WorkloadReport {
    /// Position of the first completed instance of `name`.
    pub fn first_position(&self, name: &str) -> Option<usize> {
        self.execution_order
            .iter()
            .position(|entry| instance_name(entry) == name)
    }

    /// Position of the last completed instance of `name`.
    pub fn last_position(&self, name: &str) -> Option<usize> {
        self.execution_order
            .iter()
            .rposition(|entry| instance_name(entry) == name)
    }
}

fn instance_name(entry: &str) -> &str {
    entry.split_once('#').map_or(entry, |(name, _)| name)
}

/// Start a pool from the workload's `[pool]` section and run the workload.
pub fn run_workload(workload: &WorkloadFile) -> Result<WorkloadReport> {
    let pool = TicketPool::from_config(workload.pool())?;
    Ok(run_on_pool(&pool, workload))
}

/// Run a workload on an existing pool.
///
/// Tasks are submitted in dependency order. Manual tickets are completed by
/// helper threads after their `complete_after_ms`. The call returns once
/// every ticket created by the workload has finished.
pub fn run_on_pool(pool: &TicketPool, workload: &WorkloadFile) -> WorkloadReport {
    let started = Instant::now();
    let executed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let mut tickets: HashMap<&str, Ticket> = HashMap::new();

    thread::scope(|scope| {
        for name in workload.submission_order() {
            let Some(spec) = workload.task(name) else {
                continue;
            };
            let deps: Vec<Ticket> = spec
                .after
                .iter()
                .filter_map(|dep| tickets.get(dep.as_str()).cloned())
                .collect();

            let ticket = match spec.kind() {
                TaskKind::Single => pool.submit(
                    instance_job(name.clone(), spec.work_ms, Arc::clone(&executed)),
                    spec.priority,
                    &deps,
                ),
                TaskKind::Batch => pool.submit_batch(
                    (0..spec.instances).map(|i| {
                        instance_job(format!("{name}#{i}"), spec.work_ms, Arc::clone(&executed))
                    }),
                    spec.priority,
                    &deps,
                ),
                TaskKind::Barrier => pool.submit_barrier(&deps),
                TaskKind::Manual => {
                    let ticket = pool.create_manual_ticket();
                    spawn_manual_completion(scope, pool, name, spec, ticket.clone());
                    ticket
                }
            };

            if spec.bump {
                pool.bump_priority(&ticket);
            }

            debug!(task = %name, ticket = ticket.id(), kind = ?spec.kind(), "workload task submitted");
            tickets.insert(name.as_str(), ticket);
        }

        pool.finish_all_existing();
    });

    let report = WorkloadReport {
        execution_order: executed.lock().clone(),
        stats: pool.stats(),
        elapsed: started.elapsed(),
    };

    info!(
        executed = report.execution_order.len(),
        inline = report.stats.executed_inline,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "workload finished"
    );

    report
}

fn instance_job(
    label: String,
    work_ms: u64,
    executed: Arc<Mutex<Vec<String>>>,
) -> impl FnOnce() + Send + 'static {
    move || {
        if work_ms > 0 {
            thread::sleep(Duration::from_millis(work_ms));
        }
        debug!(task = %label, "workload task done");
        executed.lock().push(label);
    }
}

fn spawn_manual_completion<'scope, 'env>(
    scope: &'scope thread::Scope<'scope, 'env>,
    pool: &'env TicketPool,
    name: &str,
    spec: &TaskSpec,
    ticket: Ticket,
) {
    let delay = Duration::from_millis(spec.complete_after_ms);
    let name = name.to_string();

    scope.spawn(move || {
        thread::sleep(delay);
        debug!(task = %name, ticket = ticket.id(), "completing manual ticket");
        pool.complete_manual_ticket(&ticket);
    });
}
