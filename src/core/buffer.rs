//! # Message Buffer
//!
//! The shared transcript: an append-only, mutex-guarded log of display
//! lines. The poller task appends inbound messages, the session loop appends
//! status and error lines, and the renderer reads a tail window. Lines are
//! already wrapped to the terminal width when they arrive here (see
//! `core::wrap`), so readers never re-measure text.
//!
//! The buffer grows for the whole session. That is deliberate: the full
//! history stays available and only a suffix window is ever rendered.

use std::sync::{Mutex, PoisonError};

/// Append-only ordered log of display lines, safe to share between the
/// background poller and the foreground session loop.
pub struct MessageBuffer {
    lines: Mutex<Vec<String>>,
}

impl MessageBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Creates a buffer pre-seeded with the given lines.
    pub fn with_lines(lines: Vec<String>) -> Self {
        Self {
            lines: Mutex::new(lines),
        }
    }

    /// Appends a single line to the end of the transcript.
    pub fn push(&self, line: impl Into<String>) {
        self.lock().push(line.into());
    }

    /// Appends a batch of lines as one unit. Readers never observe a
    /// partially appended batch.
    pub fn extend(&self, batch: Vec<String>) {
        if batch.is_empty() {
            return;
        }
        self.lock().extend(batch);
    }

    /// Returns an owned snapshot of the last `n` lines in arrival order,
    /// or the whole transcript if it is shorter than `n`.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let lines = self.lock();
        let start = lines.len().saturating_sub(n);
        lines[start..].to_vec()
    }

    /// Number of lines appended so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}
