// src/engine/stats.rs

//! Counters kept by the pool, and the snapshot type handed to callers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Task records accepted by `submit`/`submit_batch`.
    pub submitted: u64,
    /// Records executed by worker threads.
    pub executed_by_workers: u64,
    /// Records executed on a waiting caller's thread by the cooperative
    /// finish protocol.
    pub executed_inline: u64,
    /// Records moved from the waiting registry to the ready queue.
    pub promoted: u64,
    /// Records whose job panicked.
    pub panicked: u64,
    /// Records whose priority was raised by `bump_priority`.
    pub bumped: u64,
}

impl PoolStats {
    pub fn executed(&self) -> u64 {
        self.executed_by_workers + self.executed_inline
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    submitted: AtomicU64,
    executed_by_workers: AtomicU64,
    executed_inline: AtomicU64,
    promoted: AtomicU64,
    panicked: AtomicU64,
    bumped: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn add_submitted(&self, n: usize) {
        self.submitted.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_executed(&self, inline: bool) {
        if inline {
            self.executed_inline.fetch_add(1, Ordering::Relaxed);
        } else {
            self.executed_by_workers.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn add_promoted(&self, n: usize) {
        self.promoted.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_bumped(&self, n: usize) {
        self.bumped.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PoolStats {
        PoolStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            executed_by_workers: self.executed_by_workers.load(Ordering::Relaxed),
            executed_inline: self.executed_inline.load(Ordering::Relaxed),
            promoted: self.promoted.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            bumped: self.bumped.load(Ordering::Relaxed),
        }
    }
}
