use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::sink::{EmissionError, LogSink};

/// In-memory sink capturing rendered lines, for tests and non-hosted runs.
///
/// Cheap to clone: clones share one buffer, so the handle passed to
/// `configure` and the handle kept by a test observe the same lines.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.buffer())
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> Result<(), EmissionError> {
        self.buffer().push(line.to_string());
        Ok(())
    }
}
