use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;

/// Append-only, drainable record of every query the engine executed.
///
/// Handles are cheap clones over one shared buffer, so the embedding test
/// can hold the same backing store the engine writes to (the `log_buffer`
/// construction option).
#[derive(Clone, Debug, Default)]
pub struct QueryLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Everything appended since the last drain, in submission order; the
    /// buffer is left empty. Atomic with respect to concurrent appends.
    pub fn drain(&self) -> Vec<String> {
        mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
