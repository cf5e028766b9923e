use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    entered: usize,
    open: bool,
}

/// A latch used to park worker threads at a known point.
///
/// A task built with [`Gate::blocker`] records that it reached the gate and
/// then blocks until [`Gate::open`] is called. Tests use it to occupy every
/// worker so the remaining records stay queued while they set things up.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    inner: Arc<(Mutex<GateState>, Condvar)>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the gate is opened.
    pub fn pass(&self) {
        let (state, cond) = &*self.inner;
        let mut state = state.lock();
        state.entered += 1;
        cond.notify_all();
        while !state.open {
            cond.wait(&mut state);
        }
    }

    /// A job that parks the executing thread on this gate.
    pub fn blocker(&self) -> impl FnOnce() + Send + 'static {
        let gate = self.clone();
        move || gate.pass()
    }

    pub fn open(&self) {
        let (state, cond) = &*self.inner;
        state.lock().open = true;
        cond.notify_all();
    }

    /// Wait until `n` threads have reached the gate.
    ///
    /// Panics after 5 seconds so a broken test fails instead of hanging.
    pub fn wait_entered(&self, n: usize) {
        let (state, cond) = &*self.inner;
        let mut state = state.lock();
        while state.entered < n {
            let timed_out = cond.wait_for(&mut state, Duration::from_secs(5)).timed_out();
            assert!(
                !timed_out || state.entered >= n,
                "only {} of {n} threads reached the gate",
                state.entered
            );
        }
    }
}
