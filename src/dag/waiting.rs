// src/dag/waiting.rs

//! Registry of records blocked on at least one outstanding ticket.

use tracing::debug;

use crate::dag::record::TaskRecord;
use crate::types::{Priority, TicketId};

/// Records waiting on unfinished tickets.
///
/// Each record's wait-set only ever shrinks: [`WaitingRegistry::resolve`]
/// removes a finished id from every record exactly once, and records whose
/// wait-set becomes empty leave the registry.
#[derive(Debug, Default)]
pub struct WaitingRegistry {
    records: Vec<TaskRecord>,
}

/// Result of raising the priority of a waiting ticket.
#[derive(Debug, Default)]
pub struct RaisedWaiting {
    pub raised: usize,
    /// Dependencies of the raised records, to be raised in turn.
    pub dependencies: Vec<TicketId>,
}

impl WaitingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, record: TaskRecord) {
        debug_assert!(record.is_blocked(), "unblocked record filed as waiting");
        self.records.push(record);
    }

    /// Remove `finished` from every wait-set and hand back the records that
    /// no longer wait on anything.
    pub fn resolve(&mut self, finished: TicketId) -> Vec<TaskRecord> {
        let mut unblocked = Vec::new();
        let mut i = 0;

        while i < self.records.len() {
            let record = &mut self.records[i];
            if record.wait_on.remove(&finished) && record.wait_on.is_empty() {
                unblocked.push(self.records.swap_remove(i));
            } else {
                i += 1;
            }
        }

        if !unblocked.is_empty() {
            debug!(
                ticket = finished,
                unblocked = unblocked.len(),
                still_waiting = self.records.len(),
                "dependency finished; records unblocked"
            );
        }

        unblocked
    }

    /// An outstanding dependency of some waiting record owned by `ticket`.
    pub fn dependency_of(&self, ticket: TicketId) -> Option<TicketId> {
        self.records
            .iter()
            .find(|record| record.ticket == ticket)
            .and_then(TaskRecord::first_dependency)
    }

    pub fn max_priority(&self) -> Option<Priority> {
        self.records.iter().map(|record| record.priority).max()
    }

    /// Raise every record of `ticket` to at least `priority`.
    ///
    /// All dependencies of the matching records are reported, including those
    /// of records already at `priority`, so the caller can push the bump down
    /// the chain.
    pub fn raise_priority(&mut self, ticket: TicketId, priority: Priority) -> RaisedWaiting {
        let mut out = RaisedWaiting::default();

        for record in self.records.iter_mut().filter(|r| r.ticket == ticket) {
            if record.priority < priority {
                record.priority = priority;
                out.raised += 1;
            }
            out.dependencies.extend(record.wait_on.iter().copied());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn waiting(ticket: TicketId, deps: &[TicketId]) -> TaskRecord {
        TaskRecord::new(
            ticket,
            0,
            Some(Box::new(|| {})),
            deps.iter().copied().collect::<HashSet<_>>(),
        )
    }

    #[test]
    fn resolve_releases_only_fully_unblocked_records() {
        let mut reg = WaitingRegistry::new();
        reg.insert(waiting(10, &[1]));
        reg.insert(waiting(11, &[1, 2]));
        reg.insert(waiting(12, &[2]));

        let released: Vec<TicketId> = reg.resolve(1).into_iter().map(|r| r.ticket).collect();
        assert_eq!(released, vec![10]);
        assert_eq!(reg.len(), 2);

        let mut released: Vec<TicketId> = reg.resolve(2).into_iter().map(|r| r.ticket).collect();
        released.sort();
        assert_eq!(released, vec![11, 12]);
        assert!(reg.is_empty());
    }

    #[test]
    fn resolving_unknown_id_is_a_no_op() {
        let mut reg = WaitingRegistry::new();
        reg.insert(waiting(10, &[1]));
        assert!(reg.resolve(99).is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn dependency_of_points_at_outstanding_dep() {
        let mut reg = WaitingRegistry::new();
        reg.insert(waiting(10, &[4, 3]));
        assert_eq!(reg.dependency_of(10), Some(3));
        assert_eq!(reg.dependency_of(11), None);
    }

    #[test]
    fn raise_priority_reports_dependencies() {
        let mut reg = WaitingRegistry::new();
        reg.insert(waiting(10, &[4, 3]));
        reg.insert(waiting(11, &[5]));

        let raised = reg.raise_priority(10, 8);
        assert_eq!(raised.raised, 1);
        let mut deps = raised.dependencies;
        deps.sort();
        assert_eq!(deps, vec![3, 4]);
        assert_eq!(reg.max_priority(), Some(8));
    }
}
