// src/dag/table.rs

//! Ticket table: outstanding instance counts per ticket id.
//!
//! Presence in the table means "outstanding". Erasure happens exactly once
//! per id and is the authoritative finish event.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tracing::warn;

use crate::types::TicketId;

#[derive(Debug)]
pub struct TicketTable {
    next_id: TicketId,
    counts: HashMap<TicketId, usize>,
}

impl Default for TicketTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketTable {
    pub fn new() -> Self {
        Self {
            // 0 is reserved for the finished sentinel.
            next_id: 1,
            counts: HashMap::new(),
        }
    }

    /// Allocate a fresh id with `count` outstanding instances.
    pub fn allocate(&mut self, count: usize) -> TicketId {
        debug_assert!(count > 0, "allocating a ticket with nothing outstanding");
        let id = self.next_id;
        self.next_id += 1;
        self.counts.insert(id, count);
        id
    }

    pub fn is_outstanding(&self, id: TicketId) -> bool {
        self.counts.contains_key(&id)
    }

    pub fn remaining(&self, id: TicketId) -> Option<usize> {
        self.counts.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Account for one finished instance. Returns `true` if this erased the
    /// id.
    pub fn complete_one(&mut self, id: TicketId) -> bool {
        match self.counts.get_mut(&id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.counts.remove(&id);
                true
            }
            None => {
                warn!(ticket = id, "completion for a ticket that is not outstanding");
                false
            }
        }
    }

    /// Erase `id` regardless of its count. Returns `true` if it was present.
    pub fn force_complete(&mut self, id: TicketId) -> bool {
        self.counts.remove(&id).is_some()
    }

    /// The subset of `ids` still outstanding.
    pub fn outstanding_among<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a TicketId>,
    ) -> HashSet<TicketId> {
        ids.into_iter()
            .copied()
            .filter(|id| self.counts.contains_key(id))
            .collect()
    }

    pub fn outstanding_ids(&self) -> Vec<TicketId> {
        let mut ids: Vec<TicketId> = self.counts.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Shared, read-mostly ticket table.
pub type SharedTicketTable = RwLock<TicketTable>;
