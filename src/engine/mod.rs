// src/engine/mod.rs

//! Scheduling engine.
//!
//! - [`pool`] is the public façade ([`TicketPool`]).
//! - [`ticket`] holds the [`Ticket`] handle.
//! - [`shared`] is the state shared by the pool, its workers and tickets:
//!   submission placement, completion and promotion.
//! - [`finish`] implements the cooperative finish protocol behind
//!   [`Ticket::wait`] and [`TicketPool::finish_all_existing`].
//! - [`priority`] implements [`TicketPool::bump_priority`].
//! - [`stats`] exposes counters as [`PoolStats`].

mod finish;
pub mod pool;
mod priority;
pub(crate) mod shared;
pub mod stats;
pub mod ticket;

pub use pool::TicketPool;
pub use stats::PoolStats;
pub use ticket::Ticket;
