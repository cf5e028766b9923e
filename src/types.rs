// src/types.rs

//! Small shared types used across the pool.

use std::fmt;

/// Identity of a ticket. Assigned from a per-pool counter and never reused.
pub type TicketId = u64;

/// Task priority. Higher runs first.
pub type Priority = u32;

/// A unit of executable work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Id carried by default-constructed tickets. The pool counter starts at 1,
/// so this id is never outstanding.
pub const FINISHED_TICKET_ID: TicketId = 0;

/// Which admission floor a worker thread was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    /// Accepts any ready task.
    General,
    /// Only accepts tasks at or above the pool's high-priority threshold.
    HighPriority,
}

impl WorkerRole {
    /// Lowest priority this role will pick up.
    pub fn floor(self, high_priority_threshold: Priority) -> Priority {
        match self {
            WorkerRole::General => 0,
            WorkerRole::HighPriority => high_priority_threshold,
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerRole::General => f.write_str("general"),
            WorkerRole::HighPriority => f.write_str("high-priority"),
        }
    }
}
