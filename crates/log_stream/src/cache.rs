use std::collections::HashMap;

use crate::entry::LogEntry;
use crate::status::StreamStatus;

/// Last known state of a job's log channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedChannel {
    pub entries: Vec<LogEntry>,
    pub status: StreamStatus,
}

/// Per-job retention of synchronized output, keyed by job id.
///
/// An entry is created on first observation, updated on status transitions
/// and teardown, and read back whenever the same job id is observed again.
/// Entries live for the process lifetime; nothing is evicted.
#[derive(Debug, Default)]
pub struct LogCache {
    channels: HashMap<String, CachedChannel>,
}

impl LogCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, job_id: &str, entries: Vec<LogEntry>, status: StreamStatus) {
        self.channels
            .insert(job_id.to_owned(), CachedChannel { entries, status });
    }

    #[must_use]
    pub fn get(&self, job_id: &str) -> Option<&CachedChannel> {
        self.channels.get(job_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
