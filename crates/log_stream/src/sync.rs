use crate::cache::LogCache;
use crate::entry::{EntryKind, LogEntry};
use crate::status::{JobStatus, StreamStatus};

/// Consumer-visible snapshot: the ordered entries plus one status value.
#[derive(Debug, Clone, PartialEq)]
pub struct LogView {
    pub entries: Vec<LogEntry>,
    pub status: StreamStatus,
}

impl Default for LogView {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            status: StreamStatus::Idle,
        }
    }
}

/// What the driver must do after a job switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPlan {
    /// No job observed, or no credential available.
    Idle,
    /// Cached terminal state restored; no channel may be opened.
    Settled,
    /// Cached live state restored; open a channel for new events only.
    Resume { generation: u64 },
    /// Nothing cached; fetch history, then open a channel.
    Connect { generation: u64 },
}

/// Pure synchronization state machine for the observed job.
///
/// Inputs are the observed job id and channel events tagged with the
/// generation captured when that id was installed; events from a torn-down
/// channel carry a stale generation and are discarded per event. All methods
/// are synchronous so the machine can be exercised without any I/O.
#[derive(Debug)]
pub struct LogSync {
    cache: LogCache,
    job_id: Option<String>,
    generation: u64,
    entries: Vec<LogEntry>,
    status: StreamStatus,
    /// Most recent terminal status reported by a status event.
    completion: Option<JobStatus>,
}

impl Default for LogSync {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSync {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: LogCache::new(),
            job_id: None,
            generation: 0,
            entries: Vec::new(),
            status: StreamStatus::Idle,
            completion: None,
        }
    }

    #[must_use]
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> StreamStatus {
        self.status
    }

    #[must_use]
    pub fn view(&self) -> LogView {
        LogView {
            entries: self.entries.clone(),
            status: self.status,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &LogCache {
        &self.cache
    }

    /// True while `generation` identifies the currently observed job.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.job_id.is_some() && generation == self.generation
    }

    /// Switches the observed job id.
    ///
    /// Flushes the previous job's accumulated entries into the cache, resets
    /// the working state, and decides how the new id is brought live: idle
    /// without an id or credential, restored from cache (settled or
    /// resumable), or connected from scratch.
    pub fn set_job(&mut self, job_id: Option<String>, has_credential: bool) -> SyncPlan {
        self.flush_to_cache();
        self.generation += 1;
        self.entries.clear();
        self.completion = None;
        self.job_id = None;

        let Some(job_id) = job_id.filter(|_| has_credential) else {
            self.status = StreamStatus::Idle;
            return SyncPlan::Idle;
        };

        if let Some(cached) = self.cache.get(&job_id) {
            self.entries = cached.entries.clone();
            self.status = cached.status;
            if let StreamStatus::Job(status) = cached.status {
                if status.is_terminal() {
                    self.completion = Some(status);
                }
            }
            self.job_id = Some(job_id);
            if self.status.is_terminal() {
                return SyncPlan::Settled;
            }
            return SyncPlan::Resume {
                generation: self.generation,
            };
        }

        self.status = StreamStatus::Connecting;
        self.job_id = Some(job_id);
        SyncPlan::Connect {
            generation: self.generation,
        }
    }

    /// Channel establishment for the current generation.
    pub fn apply_connected(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) || self.status.is_terminal() {
            return false;
        }
        self.status = StreamStatus::Connected;
        true
    }

    /// One delivered frame. Returns true when the entry was accepted.
    pub fn apply_frame(&mut self, generation: u64, entry: LogEntry) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        if entry.kind == EntryKind::System {
            return false;
        }
        if self
            .entries
            .iter()
            .any(|existing| existing.same_identity(&entry))
        {
            return false;
        }

        let status_update = match entry.kind {
            EntryKind::Status => entry.status,
            _ => None,
        };
        self.entries.push(entry);

        if let Some(status) = status_update {
            self.status = StreamStatus::Job(status);
            if status.is_terminal() {
                self.completion = Some(status);
            }
            self.write_through();
        }
        true
    }

    /// Wholesale replacement from a historical fetch on first attach.
    pub fn apply_backfill(
        &mut self,
        generation: u64,
        entries: Vec<LogEntry>,
        status: JobStatus,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.entries = entries;
        self.status = StreamStatus::Job(status);
        if status.is_terminal() {
            self.completion = Some(status);
        }
        self.write_through();
        true
    }

    /// Channel closure. A clean close settles on the last reported completion
    /// status (or the generic one); any other close is a disconnection unless
    /// the job already reached a terminal status.
    pub fn apply_close(&mut self, generation: u64, normal: bool) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        if normal {
            self.status = StreamStatus::Job(self.completion.unwrap_or(JobStatus::Completed));
        } else if !self.status.is_terminal() {
            self.status = StreamStatus::Disconnected;
        }
        self.write_through();
        true
    }

    /// Channel-level failure; accumulated entries stay intact.
    pub fn apply_error(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.status = StreamStatus::Error;
        self.write_through();
        true
    }

    fn flush_to_cache(&mut self) {
        if let Some(previous) = self.job_id.take() {
            if !self.entries.is_empty() {
                self.cache
                    .store(&previous, std::mem::take(&mut self.entries), self.status);
            }
        }
    }

    fn write_through(&mut self) {
        if let Some(job_id) = self.job_id.as_ref() {
            self.cache.store(job_id, self.entries.clone(), self.status);
        }
    }
}
