// src/dag/ready.rs

//! Priority-ordered queue of records whose dependencies are all finished.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::dag::record::TaskRecord;
use crate::types::{Priority, TicketId};

/// Heap entry ordered by priority only. Equal priorities have no defined
/// order.
#[derive(Debug)]
struct ByPriority(TaskRecord);

impl PartialEq for ByPriority {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority
    }
}

impl Eq for ByPriority {}

impl PartialOrd for ByPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.priority.cmp(&other.0.priority)
    }
}

/// Max-heap of ready task records.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<ByPriority>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push(&mut self, record: TaskRecord) {
        debug_assert!(!record.is_blocked(), "blocked record pushed to ready queue");
        self.heap.push(ByPriority(record));
    }

    /// Pop the highest-priority record if it is at or above `floor`.
    pub fn pop_at_or_above(&mut self, floor: Priority) -> Option<TaskRecord> {
        if self.heap.peek()?.0.priority < floor {
            return None;
        }
        self.heap.pop().map(|entry| entry.0)
    }

    /// Whether a worker with the given floor would find work.
    pub fn has_work_for(&self, floor: Priority) -> bool {
        self.heap
            .peek()
            .is_some_and(|entry| entry.0.priority >= floor)
    }

    pub fn max_priority(&self) -> Option<Priority> {
        self.heap.peek().map(|entry| entry.0.priority)
    }

    pub fn contains_ticket(&self, ticket: TicketId) -> bool {
        self.heap.iter().any(|entry| entry.0.ticket == ticket)
    }

    /// Remove one record belonging to `ticket`, regardless of its position.
    pub fn take_for_ticket(&mut self, ticket: TicketId) -> Option<TaskRecord> {
        if !self.contains_ticket(ticket) {
            return None;
        }

        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let taken = entries
            .iter()
            .position(|entry| entry.0.ticket == ticket)
            .map(|pos| entries.swap_remove(pos).0);
        self.heap = BinaryHeap::from(entries);
        taken
    }

    /// Raise every record of `ticket` to at least `priority` and re-sort.
    ///
    /// Returns how many records changed.
    pub fn raise_priority(&mut self, ticket: TicketId, priority: Priority) -> usize {
        if !self.contains_ticket(ticket) {
            return 0;
        }

        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let mut raised = 0;
        for entry in entries.iter_mut() {
            if entry.0.ticket == ticket && entry.0.priority < priority {
                entry.0.priority = priority;
                raised += 1;
            }
        }
        self.heap = BinaryHeap::from(entries);
        raised
    }
}
