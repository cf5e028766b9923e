// src/engine/finish.rs

//! Cooperative finish protocol.
//!
//! A thread that needs a ticket finished does not idle while it waits. Each
//! iteration looks at the id on top of an explicit stack and does exactly one
//! of:
//!
//! 1. the id has a record in the ready queue: take it and run it here;
//! 2. the id has a record in the waiting registry: push one of that record's
//!    outstanding dependencies and drive it first;
//! 3. neither: the id is being executed by another thread (or is a manual
//!    ticket), so block on `ticket_finished` until it is erased.
//!
//! A dependency always has a smaller id than its dependent, so the stack only
//! ever holds a strictly decreasing chain of ids and the walk terminates
//! without recursion no matter how deep the chain is.

use tracing::trace;

use crate::engine::shared::{ExecOrigin, Shared};
use crate::types::TicketId;

/// What one iteration of the protocol decided.
#[derive(Debug)]
enum Step {
    Finished,
    RanInline,
    Descend(TicketId),
    BlockedElsewhere,
}

impl Shared {
    /// Drive `target` to completion, helping with pool work along the way.
    pub(crate) fn finish(&self, target: TicketId) {
        let mut stack = vec![target];

        while let Some(&id) = stack.last() {
            match self.finish_step(id) {
                Step::Finished | Step::BlockedElsewhere => {
                    stack.pop();
                }
                Step::RanInline => {}
                Step::Descend(dep) => {
                    debug_assert!(dep < id, "dependency {dep} is not older than {id}");
                    stack.push(dep);
                }
            }
        }
    }

    fn finish_step(&self, id: TicketId) -> Step {
        let mut queues = self.queues.lock();

        if !self.is_outstanding(id) {
            return Step::Finished;
        }

        if let Some(record) = queues.ready.take_for_ticket(id) {
            drop(queues);
            trace!(ticket = id, "finish: running ready record inline");
            self.run_record(record, ExecOrigin::Inline);
            return Step::RanInline;
        }

        if let Some(dep) = queues.waiting.dependency_of(id) {
            trace!(ticket = id, dependency = dep, "finish: blocked; driving dependency");
            return Step::Descend(dep);
        }

        trace!(ticket = id, "finish: running elsewhere; blocking");
        self.ticket_finished
            .wait_while(&mut queues, |_| self.is_outstanding(id));
        Step::BlockedElsewhere
    }

    /// Finish every ticket outstanding right now. Tickets created while this
    /// runs are not waited for.
    pub(crate) fn finish_all_existing(&self) {
        let snapshot = self.tickets.read().outstanding_ids();
        trace!(tickets = snapshot.len(), "finish_all_existing: snapshot taken");

        for id in snapshot {
            self.finish(id);
        }
    }
}
