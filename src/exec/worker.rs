// src/exec/worker.rs

//! Worker threads.
//!
//! Each worker loops `Idle -> Scanning -> Running -> Idle` until shutdown:
//! it takes the highest-priority ready record at or above its floor, runs it
//! outside every lock, and reports the completion back to the shared state,
//! which handles erasure, waking finish-waiters and promotion.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, trace, warn};

use crate::config::PoolConfig;
use crate::engine::shared::{ExecOrigin, Shared};
use crate::errors::{Result, TicketPoolError};
use crate::types::{Priority, WorkerRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Scanning,
    Running,
    Shutdown,
}

/// A spawned worker thread.
#[derive(Debug)]
pub(crate) struct WorkerHandle {
    pub(crate) index: usize,
    pub(crate) role: WorkerRole,
    pub(crate) thread: JoinHandle<()>,
}

/// Spawn `config.total_workers` threads; the first
/// `config.high_priority_workers` of them only accept high-priority work.
///
/// If any spawn fails, the threads already started are shut down and joined
/// before the error is returned.
pub(crate) fn spawn_workers(shared: &Arc<Shared>, config: &PoolConfig) -> Result<Vec<WorkerHandle>> {
    let mut workers = Vec::with_capacity(config.total_workers);

    for index in 0..config.total_workers {
        let role = if index < config.high_priority_workers {
            WorkerRole::HighPriority
        } else {
            WorkerRole::General
        };
        let floor = role.floor(config.high_priority_threshold);
        let worker_shared = Arc::clone(shared);

        let spawned = thread::Builder::new()
            .name(format!("{}-{index}", config.thread_name_prefix))
            .spawn(move || worker_loop(worker_shared, index, role, floor));

        match spawned {
            Ok(thread) => workers.push(WorkerHandle {
                index,
                role,
                thread,
            }),
            Err(source) => {
                warn!(index, error = %source, "failed to spawn worker; stopping the ones already started");
                shared.request_shutdown();
                for worker in workers {
                    let _ = worker.thread.join();
                }
                return Err(TicketPoolError::WorkerSpawn { index, source });
            }
        }
    }

    Ok(workers)
}

fn worker_loop(shared: Arc<Shared>, index: usize, role: WorkerRole, floor: Priority) {
    debug!(worker = index, %role, floor, "worker started");
    let mut state = WorkerState::Idle;
    let mut executed = 0u64;

    loop {
        transition(index, &mut state, WorkerState::Scanning);
        let Some(record) = shared.next_for_worker(floor) else {
            transition(index, &mut state, WorkerState::Shutdown);
            break;
        };

        transition(index, &mut state, WorkerState::Running);
        shared.run_record(record, ExecOrigin::Worker(index));
        executed += 1;
        transition(index, &mut state, WorkerState::Idle);
    }

    info!(worker = index, %role, executed, "worker stopped");
}

fn transition(index: usize, state: &mut WorkerState, next: WorkerState) {
    trace!(worker = index, from = ?*state, to = ?next, "worker state");
    *state = next;
}
