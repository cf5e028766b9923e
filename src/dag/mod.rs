// src/dag/mod.rs

//! Dependency bookkeeping for the pool.
//!
//! - [`record`] defines the schedulable task record.
//! - [`ready`] holds records whose dependencies have all finished.
//! - [`waiting`] holds records still blocked on outstanding tickets.
//! - [`table`] tracks outstanding instance counts per ticket id.
//!
//! None of these types lock anything themselves; the engine owns the locks.

pub mod ready;
pub mod record;
pub mod table;
pub mod waiting;

pub use ready::ReadyQueue;
pub use record::TaskRecord;
pub use table::{SharedTicketTable, TicketTable};
pub use waiting::{RaisedWaiting, WaitingRegistry};
