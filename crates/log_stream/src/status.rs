use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the jobs service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    TimedOut,
    /// Generic completion used when a channel closes cleanly without ever
    /// reporting a specific terminal status.
    Completed,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            "TIMED_OUT" => Self::TimedOut,
            "COMPLETED" => Self::Completed,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::TimedOut => "TIMED_OUT",
            Self::Completed => "COMPLETED",
        }
    }

    /// True once the job can produce no further events.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

/// Consumer-visible status of one observed log channel. Reflects both
/// transport connectivity and the underlying job lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Idle,
    Connecting,
    Connected,
    Disconnected,
    Error,
    Job(JobStatus),
}

impl StreamStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
            Self::Error => "ERROR",
            Self::Job(status) => status.as_str(),
        }
    }

    /// True when no channel may be opened or reopened for this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Job(status) if status.is_terminal())
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{JobStatus, StreamStatus};

    #[test]
    fn status_parse_round_trips_wire_strings() {
        for value in [
            "PENDING",
            "RUNNING",
            "SUCCEEDED",
            "FAILED",
            "CANCELLED",
            "TIMED_OUT",
            "COMPLETED",
        ] {
            let status = JobStatus::parse(value).expect("known status");
            assert_eq!(status.as_str(), value);
        }
        assert_eq!(JobStatus::parse("succeeded"), Some(JobStatus::Succeeded));
        assert_eq!(JobStatus::parse("EXPLODED"), None);
    }

    #[test]
    fn only_settled_jobs_are_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::TimedOut.is_terminal());

        assert!(StreamStatus::Job(JobStatus::Failed).is_terminal());
        assert!(!StreamStatus::Job(JobStatus::Running).is_terminal());
        assert!(!StreamStatus::Disconnected.is_terminal());
        assert!(!StreamStatus::Error.is_terminal());
    }
}
