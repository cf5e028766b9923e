// src/engine/priority.rs

//! Priority escalation for tickets that are already queued.

use std::collections::HashSet;

use tracing::debug;

use crate::engine::shared::Shared;
use crate::types::{Priority, TicketId};

impl Shared {
    /// Raise every record of `id`, and transitively every record it waits
    /// on, to one above the highest priority currently queued.
    ///
    /// Returns how many records were raised.
    pub(crate) fn bump_priority(&self, id: TicketId) -> usize {
        let mut queues = self.queues.lock();

        if !self.is_outstanding(id) {
            return 0;
        }

        let ceiling: Priority = queues
            .ready
            .max_priority()
            .into_iter()
            .chain(queues.waiting.max_priority())
            .max()
            .unwrap_or(0);
        let target = ceiling.saturating_add(1);

        let mut stack = vec![id];
        let mut seen = HashSet::new();
        let mut raised = 0usize;

        while let Some(ticket) = stack.pop() {
            if !seen.insert(ticket) {
                continue;
            }
            raised += queues.ready.raise_priority(ticket, target);
            let waiting = queues.waiting.raise_priority(ticket, target);
            raised += waiting.raised;
            stack.extend(waiting.dependencies);
        }

        debug!(ticket = id, priority = target, raised, visited = seen.len(), "priority bumped");

        if raised > 0 {
            self.stats.add_bumped(raised);
            // The new priority may clear the high-priority floor.
            self.work_available.notify_all();
        }

        raised
    }
}
