// src/engine/ticket.rs

//! Ticket handles.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::{trace, warn};

use crate::engine::shared::Shared;
use crate::types::{FINISHED_TICKET_ID, TicketId};

/// Handle to one ticket of a [`TicketPool`](crate::engine::TicketPool).
///
/// A ticket does not own its work; it is a lookup key plus a weak reference
/// to the pool that issued it. Once a ticket has been observed finished the
/// result is cached, and since ids are never reused it never flips back.
///
/// `Ticket::default()` is already finished and refers to no pool.
///
/// Work still outstanding when its pool is dropped is abandoned. Its ticket
/// never reports finished, and tasks of other pools that depend on it never
/// run.
pub struct Ticket {
    pool: Weak<Shared>,
    id: TicketId,
    finished: AtomicBool,
}

impl Ticket {
    pub(crate) fn new(pool: &Arc<Shared>, id: TicketId) -> Self {
        Self {
            pool: Arc::downgrade(pool),
            id,
            finished: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Whether the ticket's work has fully completed.
    pub fn finished(&self) -> bool {
        if self.finished.load(Ordering::Acquire) {
            return true;
        }

        let done = match self.pool.upgrade() {
            Some(shared) => !shared.is_outstanding(self.id),
            None => false,
        };

        if done {
            self.finished.store(true, Ordering::Release);
        }
        done
    }

    /// Block until the ticket finishes.
    ///
    /// The calling thread helps: ready work belonging to this ticket, or to
    /// the tickets it depends on, is executed right here instead of waiting
    /// for a worker. This keeps waits from inside tasks deadlock-free.
    ///
    /// There is no timeout. Waiting on a manual ticket that nobody completes
    /// blocks forever.
    ///
    /// An abandoned ticket returns at once and keeps reporting unfinished;
    /// check [`Ticket::finished`] afterwards if the pool may be gone.
    pub fn wait(&self) {
        if self.finished() {
            return;
        }

        let Some(shared) = self.pool.upgrade() else {
            warn!(ticket = self.id, "wait on a ticket whose pool was dropped; its work will never run");
            return;
        };

        trace!(ticket = self.id, "waiting cooperatively");
        shared.finish(self.id);
        self.finished.store(true, Ordering::Release);
    }

    /// Unfinished work whose pool no longer exists.
    pub fn is_abandoned(&self) -> bool {
        !self.finished.load(Ordering::Acquire) && self.pool.strong_count() == 0
    }

    pub(crate) fn belongs_to(&self, shared: &Arc<Shared>) -> bool {
        self.id == FINISHED_TICKET_ID || std::ptr::eq(self.pool.as_ptr(), Arc::as_ptr(shared))
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Self {
            pool: Weak::new(),
            id: FINISHED_TICKET_ID,
            finished: AtomicBool::new(true),
        }
    }
}

impl Clone for Ticket {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            id: self.id,
            finished: AtomicBool::new(self.finished.load(Ordering::Acquire)),
        }
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.pool, &other.pool)
    }
}

impl Eq for Ticket {}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("id", &self.id)
            .field("finished_cached", &self.finished.load(Ordering::Relaxed))
            .finish()
    }
}
