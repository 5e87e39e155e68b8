//! Per-manager log sink for lifecycle events.
//!
//! The buffer is constructed explicitly by the caller and handed to the
//! [`SandboxManager`](crate::SandboxManager) at construction time, scoped to
//! that one manager instance. Nothing here is process-global.

use std::sync::{Arc, Mutex};

/// A cloneable, internally synchronized line buffer.
///
/// The manager records state transitions and cleanup outcomes into it; tests
/// can read the captured lines back with [`lines`](Self::lines) or
/// [`contents`](Self::contents).
#[derive(Clone, Debug, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub(crate) fn record(&self, line: impl Into<String>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.into());
        }
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// All captured lines joined with newlines.
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    /// True if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().map(|l| l.is_empty()).unwrap_or(true)
    }
}
