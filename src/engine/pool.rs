// src/engine/pool.rs

//! The public façade: construction, submission and bulk draining.

use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::config::{PoolConfig, validate_pool_config};
use crate::engine::shared::Shared;
use crate::engine::stats::PoolStats;
use crate::engine::ticket::Ticket;
use crate::errors::Result;
use crate::exec::worker::{WorkerHandle, spawn_workers};
use crate::types::{Job, Priority, TicketId};

/// A fixed pool of worker threads executing prioritised tasks whose
/// dependencies are expressed through [`Ticket`]s.
///
/// Dropping the pool stops the workers once the ready work they are allowed
/// to take has drained. Records still waiting on dependencies are abandoned.
#[derive(Debug)]
pub struct TicketPool {
    shared: Arc<Shared>,
    workers: Vec<WorkerHandle>,
    config: PoolConfig,
}

impl TicketPool {
    /// Start a pool of `total_workers` threads, of which
    /// `high_priority_workers` only run tasks with priority at or above
    /// `high_priority_threshold`.
    ///
    /// Fails if `high_priority_workers >= total_workers` or a thread cannot
    /// be spawned.
    pub fn new(
        total_workers: usize,
        high_priority_workers: usize,
        high_priority_threshold: Priority,
    ) -> Result<Self> {
        Self::from_config(&PoolConfig::new(
            total_workers,
            high_priority_workers,
            high_priority_threshold,
        ))
    }

    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        validate_pool_config(config)?;

        let shared = Arc::new(Shared::new(
            config.high_priority_threshold,
            config.high_priority_workers,
        ));
        let workers = spawn_workers(&shared, config)?;

        info!(
            total_workers = config.total_workers,
            high_priority_workers = config.high_priority_workers,
            general_workers = config.general_workers(),
            high_priority_threshold = config.high_priority_threshold,
            "ticket pool started"
        );

        Ok(Self {
            shared,
            workers,
            config: config.clone(),
        })
    }

    /// Submit one task that runs once every ticket in `deps` has finished.
    pub fn submit<F>(&self, work: F, priority: Priority, deps: &[Ticket]) -> Ticket
    where
        F: FnOnce() + Send + 'static,
    {
        let deps = self.dependency_ids(deps);
        let id = self.shared.submit_jobs(vec![Box::new(work)], priority, &deps);
        Ticket::new(&self.shared, id)
    }

    /// Submit several tasks under one shared ticket, which finishes once all
    /// of them have run. An empty batch yields an already-finished ticket.
    pub fn submit_batch<I, F>(&self, works: I, priority: Priority, deps: &[Ticket]) -> Ticket
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() + Send + 'static,
    {
        let jobs: Vec<Job> = works
            .into_iter()
            .map(|work| Box::new(work) as Job)
            .collect();

        if jobs.is_empty() {
            debug!("empty batch submitted; returning finished ticket");
            return Ticket::default();
        }

        let deps = self.dependency_ids(deps);
        let id = self.shared.submit_jobs(jobs, priority, &deps);
        Ticket::new(&self.shared, id)
    }

    /// A ticket with no work that finishes when every ticket in `deps` has.
    ///
    /// Returns an already-finished ticket when nothing in `deps` is
    /// outstanding.
    pub fn submit_barrier(&self, deps: &[Ticket]) -> Ticket {
        let deps = self.dependency_ids(deps);
        match self.shared.submit_barrier(&deps) {
            Some(id) => Ticket::new(&self.shared, id),
            None => Ticket::default(),
        }
    }

    /// A ticket no worker will ever run. It finishes only through
    /// [`TicketPool::complete_manual_ticket`], which makes it a bridge for
    /// completion events from outside the pool.
    pub fn create_manual_ticket(&self) -> Ticket {
        Ticket::new(&self.shared, self.shared.create_manual())
    }

    /// Finish a ticket obtained from [`TicketPool::create_manual_ticket`].
    ///
    /// Passing any other ticket is unsupported: the pool does not track
    /// ticket kinds and will erase the ticket whatever work it still has.
    pub fn complete_manual_ticket(&self, ticket: &Ticket) {
        if !ticket.belongs_to(&self.shared) {
            warn!(ticket = ticket.id(), "complete_manual_ticket with a ticket from another pool; ignoring");
            return;
        }
        self.shared.complete_manual(ticket.id());
    }

    /// Escalate a ticket and everything it still waits on above all queued
    /// work.
    ///
    /// The new priority is one above the highest queued priority. When work
    /// at or above `high_priority_threshold` is queued, the bumped records
    /// cross the threshold too and become eligible for the reserved
    /// high-priority workers.
    pub fn bump_priority(&self, ticket: &Ticket) {
        if ticket.finished() || !ticket.belongs_to(&self.shared) {
            return;
        }
        self.shared.bump_priority(ticket.id());
    }

    /// Block until every ticket outstanding at call time has finished,
    /// helping with the work on this thread.
    pub fn finish_all_existing(&self) {
        self.shared.finish_all_existing();
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn high_priority_threshold(&self) -> Priority {
        self.shared.high_priority_threshold
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of tickets not yet finished.
    pub fn outstanding_tickets(&self) -> usize {
        self.shared.tickets.read().len()
    }

    pub fn stats(&self) -> PoolStats {
        self.shared.stats()
    }

    /// Ids of the dependencies that can still matter.
    ///
    /// Tickets issued by a different pool cannot be tracked here, so they
    /// are waited for on the submitting thread before the task is filed.
    /// An abandoned dependency is replaced by a manual ticket nobody
    /// completes, so the dependent never runs.
    fn dependency_ids(&self, deps: &[Ticket]) -> Vec<TicketId> {
        let mut ids = Vec::with_capacity(deps.len());
        let mut stand_in: Option<TicketId> = None;

        for ticket in deps.iter().filter(|ticket| !ticket.finished()) {
            if ticket.belongs_to(&self.shared) {
                ids.push(ticket.id());
                continue;
            }

            if !ticket.is_abandoned() {
                warn!(ticket = ticket.id(), "dependency issued by another pool; waiting for it now");
                ticket.wait();
            }
            if ticket.finished() {
                continue;
            }

            warn!(ticket = ticket.id(), "dependency belongs to a dropped pool; dependent will never run");
            if stand_in.is_none() {
                let id = self.shared.create_manual();
                ids.push(id);
                stand_in = Some(id);
            }
        }

        ids
    }
}

impl Drop for TicketPool {
    fn drop(&mut self) {
        self.shared.request_shutdown();

        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            if worker.thread.thread().id() == current {
                warn!(worker = worker.index, "pool dropped from one of its own workers; not joining it");
                continue;
            }
            if worker.thread.join().is_err() {
                warn!(worker = worker.index, role = %worker.role, "worker thread panicked");
            }
        }

        info!("ticket pool stopped");
    }
}
