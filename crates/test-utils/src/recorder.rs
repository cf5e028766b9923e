use std::sync::Arc;

use parking_lot::Mutex;

/// Shared, ordered log of executed task labels.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, label: impl Into<String>) {
        self.entries.lock().push(label.into());
    }

    /// A job that appends `label` when it runs.
    pub fn job(&self, label: impl Into<String>) -> impl FnOnce() + Send + 'static {
        let recorder = self.clone();
        let label = label.into();
        move || recorder.push(label)
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.lock().iter().position(|entry| entry == label)
    }

    /// Panics unless `before` was recorded strictly earlier than `after`.
    pub fn assert_before(&self, before: &str, after: &str) {
        let entries = self.entries();
        let b = entries.iter().position(|e| e == before);
        let a = entries.iter().position(|e| e == after);
        match (b, a) {
            (Some(b), Some(a)) => assert!(b < a, "expected {before} before {after}: {entries:?}"),
            _ => panic!("missing {before} or {after} in {entries:?}"),
        }
    }
}
