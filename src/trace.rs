//! Per-invocation execution trace.
//!
//! An ordered, append-only list of timestamped messages that travels through
//! every pipeline stage and is returned verbatim to the caller, on success and
//! on failure alike. Each entry is also mirrored to `tracing` at debug level
//! so the same story shows up in the process log.
//!
//! Rendered entries look like:
//!
//! ```text
//! [14:02:07] - Processing operation: create-thumbnail
//! [14:02:07] - Original size: 200x100
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;

/// One trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl TraceEntry {
    /// `[HH:MM:SS] - message`
    pub fn render(&self) -> String {
        format!("[{}] - {}", self.at.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current local time.
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "imgrelay::trace", "{message}");
        self.entries.push(TraceEntry {
            at: Local::now(),
            message,
        });
    }

    /// Append an error line. Errors are prefixed so they stand out in the list.
    pub fn record_error(&mut self, message: impl std::fmt::Display) {
        self.record(format!("ERROR: {message}"));
    }

    pub fn record_warning(&mut self, message: impl std::fmt::Display) {
        self.record(format!("WARNING: {message}"));
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.message.as_str())
    }

    /// Rendered lines, in order, as returned in the response body.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(TraceEntry::render).collect()
    }
}

impl Serialize for ExecutionTrace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter().map(TraceEntry::render))
    }
}
