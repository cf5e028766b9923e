// tests/common/mod.rs

#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use ticketpool::{Ticket, TicketPool};

pub use ticketpool_test_utils::gate::Gate;
pub use ticketpool_test_utils::init_tracing;
pub use ticketpool_test_utils::recorder::Recorder;

pub fn pool(total: usize, high: usize, threshold: u32) -> TicketPool {
    init_tracing();
    TicketPool::new(total, high, threshold).expect("failed to start pool")
}

/// Poll until the pool has no outstanding tickets, without helping.
///
/// `wait()` runs ready work on the calling thread, which would bypass the
/// priority order the workers follow; tests that assert on that order use
/// this instead.
pub fn wait_idle(pool: &TicketPool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while pool.outstanding_tickets() > 0 {
        assert!(Instant::now() < deadline, "pool did not drain in time");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Poll `ticket.finished()` until it is true, without helping.
pub fn poll_finished(ticket: &Ticket) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !ticket.finished() {
        assert!(Instant::now() < deadline, "ticket {} did not finish in time", ticket.id());
        thread::sleep(Duration::from_millis(1));
    }
}

/// A job that records the name of the thread it ran on.
pub fn thread_name_job(recorder: &Recorder) -> impl FnOnce() + Send + 'static {
    let recorder = recorder.clone();
    move || {
        let name = thread::current().name().unwrap_or("<unnamed>").to_string();
        recorder.push(name);
    }
}
