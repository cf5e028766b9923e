// src/exec/mod.rs

//! Execution layer: the worker threads that drain the ready queue.
//!
//! - [`worker`] spawns workers and owns their run loop.

pub mod worker;
