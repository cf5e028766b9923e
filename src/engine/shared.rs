// src/engine/shared.rs

//! State shared between the pool façade, its worker threads and every
//! ticket handle.
//!
//! Two locks guard it:
//! - `queues` (exclusive): ready queue, waiting registry and the quit flag.
//! - `tickets` (reader/writer): the ticket table.
//!
//! Lock order is always `queues` then `tickets`. Every write to the table
//! that can finish an id happens with `queues` held, and the waiting
//! registry is resolved in the same critical section. A thread holding
//! `queues` therefore never sees a finished id inside a wait-set.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use tracing::{debug, error, warn};

use crate::dag::{ReadyQueue, SharedTicketTable, TaskRecord, TicketTable, WaitingRegistry};
use crate::engine::stats::{PoolStats, StatsCounters};
use crate::types::{Job, Priority, TicketId};

/// Everything protected by the queue lock.
#[derive(Debug, Default)]
pub(crate) struct Queues {
    pub(crate) ready: ReadyQueue,
    pub(crate) waiting: WaitingRegistry,
    pub(crate) quit: bool,
}

/// Where a record was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecOrigin {
    Worker(usize),
    /// On a thread blocked in `wait`/`finish`.
    Inline,
}

#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) queues: Mutex<Queues>,
    pub(crate) tickets: SharedTicketTable,
    /// Signalled when ready work appears or shutdown is requested.
    pub(crate) work_available: Condvar,
    /// Signalled whenever a ticket id is erased from the table.
    pub(crate) ticket_finished: Condvar,
    pub(crate) high_priority_threshold: Priority,
    /// With mixed admission floors a single wake-up could land on a worker
    /// that cannot take the new work, so every wake-up is broadcast.
    broadcast_wakeups: bool,
    pub(crate) stats: StatsCounters,
}

impl Shared {
    pub(crate) fn new(high_priority_threshold: Priority, high_priority_workers: usize) -> Self {
        Self {
            queues: Mutex::new(Queues::default()),
            tickets: RwLock::new(TicketTable::new()),
            work_available: Condvar::new(),
            ticket_finished: Condvar::new(),
            high_priority_threshold,
            broadcast_wakeups: high_priority_workers > 0,
            stats: StatsCounters::default(),
        }
    }

    pub(crate) fn is_outstanding(&self, id: TicketId) -> bool {
        self.tickets.read().is_outstanding(id)
    }

    pub(crate) fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Allocate a ticket for `jobs` (one record each) and file every record
    /// as ready or waiting. Returns the new id.
    pub(crate) fn submit_jobs(
        &self,
        jobs: Vec<Job>,
        priority: Priority,
        deps: &[TicketId],
    ) -> TicketId {
        debug_assert!(!jobs.is_empty(), "submit_jobs called without work");
        let count = jobs.len();

        let mut queues = self.queues.lock();
        let (id, wait_on) = {
            let mut table = self.tickets.write();
            let wait_on = table.outstanding_among(deps);
            (table.allocate(count), wait_on)
        };

        self.stats.add_submitted(count);

        if wait_on.is_empty() {
            for job in jobs {
                queues
                    .ready
                    .push(TaskRecord::new(id, priority, Some(job), HashSet::new()));
            }
            debug!(ticket = id, priority, instances = count, "submitted ready");
            self.wake_workers(count);
        } else {
            debug!(
                ticket = id,
                priority,
                instances = count,
                waiting_on = ?wait_on,
                "submitted waiting on dependencies"
            );
            for job in jobs {
                queues
                    .waiting
                    .insert(TaskRecord::new(id, priority, Some(job), wait_on.clone()));
            }
        }

        id
    }

    /// File a barrier over `deps`. Returns `None` when nothing is
    /// outstanding, in which case there is nothing to wait for.
    pub(crate) fn submit_barrier(&self, deps: &[TicketId]) -> Option<TicketId> {
        let mut queues = self.queues.lock();
        let (id, wait_on) = {
            let mut table = self.tickets.write();
            let wait_on = table.outstanding_among(deps);
            if wait_on.is_empty() {
                return None;
            }
            (table.allocate(1), wait_on)
        };

        debug!(ticket = id, waiting_on = ?wait_on, "barrier filed");
        queues.waiting.insert(TaskRecord::new(id, 0, None, wait_on));
        Some(id)
    }

    pub(crate) fn create_manual(&self) -> TicketId {
        let _queues = self.queues.lock();
        let id = self.tickets.write().allocate(1);
        debug!(ticket = id, "manual ticket created");
        id
    }

    pub(crate) fn complete_manual(&self, id: TicketId) {
        let mut queues = self.queues.lock();
        let erased = self.tickets.write().force_complete(id);
        if erased {
            debug!(ticket = id, "manual ticket completed");
            self.on_finished(&mut queues, id);
        } else {
            warn!(ticket = id, "complete_manual_ticket on a ticket that is not outstanding");
        }
    }

    /// Account for one finished record of `id`.
    pub(crate) fn complete_instance(&self, id: TicketId) {
        let mut queues = self.queues.lock();
        let erased = self.tickets.write().complete_one(id);
        if erased {
            self.on_finished(&mut queues, id);
        }
    }

    /// Wake finish-waiters and promote everything `id` was holding back.
    ///
    /// Barriers unblocked along the way finish immediately, which may unblock
    /// further records; the cascade runs on an explicit worklist.
    fn on_finished(&self, queues: &mut MutexGuard<'_, Queues>, id: TicketId) {
        let mut finished = vec![id];
        let mut promoted = 0usize;

        while let Some(done) = finished.pop() {
            debug!(ticket = done, "ticket finished");
            for record in queues.waiting.resolve(done) {
                if record.is_barrier() {
                    if self.tickets.write().complete_one(record.ticket) {
                        finished.push(record.ticket);
                    }
                } else {
                    queues.ready.push(record);
                    promoted += 1;
                }
            }
        }

        self.ticket_finished.notify_all();

        if promoted > 0 {
            self.stats.add_promoted(promoted);
            debug!(ticket = id, promoted, "promoted unblocked records to ready");
            self.wake_workers(promoted);
        }
    }

    /// Wake one worker for a single new record when any worker could take
    /// it, otherwise all of them.
    pub(crate) fn wake_workers(&self, new_records: usize) {
        match new_records {
            0 => {}
            1 if !self.broadcast_wakeups => {
                self.work_available.notify_one();
            }
            _ => {
                self.work_available.notify_all();
            }
        }
    }

    /// Block until a ready record at or above `floor` exists, or shutdown.
    pub(crate) fn next_for_worker(&self, floor: Priority) -> Option<TaskRecord> {
        let mut queues = self.queues.lock();
        loop {
            if let Some(record) = queues.ready.pop_at_or_above(floor) {
                return Some(record);
            }
            if queues.quit {
                return None;
            }
            self.work_available.wait(&mut queues);
        }
    }

    /// Execute a record with no lock held, then complete it.
    ///
    /// A panicking job is logged and counted; its instance still completes so
    /// the executing thread survives and dependents are released.
    pub(crate) fn run_record(&self, mut record: TaskRecord, origin: ExecOrigin) {
        let ticket = record.ticket;

        if let Some(job) = record.take_job() {
            debug!(ticket, priority = record.priority, ?origin, "running task");
            if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                let message = panic_message(payload.as_ref());
                error!(ticket, ?origin, panic = %message, "task panicked");
                self.stats.add_panicked();
            }
            self.stats.add_executed(origin == ExecOrigin::Inline);
        }

        self.complete_instance(ticket);
    }

    pub(crate) fn request_shutdown(&self) {
        let mut queues = self.queues.lock();
        queues.quit = true;
        debug!(
            abandoned_ready = queues.ready.len(),
            abandoned_waiting = queues.waiting.len(),
            "shutdown requested"
        );
        self.work_available.notify_all();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
