// src/dag/record.rs

//! Task records: the schedulable unit stored in the ready queue and the
//! waiting registry.

use std::collections::HashSet;
use std::fmt;

use crate::types::{Job, Priority, TicketId};

/// One schedulable unit of work.
///
/// Several records may share a ticket (batches). Barrier records carry no
/// job and are completed by the pool as soon as their wait-set drains; they
/// never reach the ready queue.
pub struct TaskRecord {
    pub ticket: TicketId,
    pub priority: Priority,
    /// Ticket ids that must finish before this record becomes ready.
    pub wait_on: HashSet<TicketId>,
    job: Option<Job>,
}

impl TaskRecord {
    pub fn new(
        ticket: TicketId,
        priority: Priority,
        job: Option<Job>,
        wait_on: HashSet<TicketId>,
    ) -> Self {
        Self {
            ticket,
            priority,
            wait_on,
            job,
        }
    }

    pub fn is_barrier(&self) -> bool {
        self.job.is_none()
    }

    pub fn is_blocked(&self) -> bool {
        !self.wait_on.is_empty()
    }

    /// Take the job out for execution. Returns `None` for barriers.
    pub fn take_job(&mut self) -> Option<Job> {
        self.job.take()
    }

    /// Smallest outstanding dependency, so the cooperative walk is
    /// deterministic for a given registry state.
    pub fn first_dependency(&self) -> Option<TicketId> {
        self.wait_on.iter().copied().min()
    }
}

impl fmt::Debug for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRecord")
            .field("ticket", &self.ticket)
            .field("priority", &self.priority)
            .field("wait_on", &self.wait_on)
            .field("barrier", &self.is_barrier())
            .finish()
    }
}
