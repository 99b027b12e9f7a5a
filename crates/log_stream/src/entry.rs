use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::status::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Log,
    Status,
    Info,
    Error,
    /// Transport housekeeping; never surfaced as log content.
    System,
}

/// One synchronized log line or lifecycle marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl LogEntry {
    #[must_use]
    pub fn log(message: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            kind: EntryKind::Log,
            timestamp,
            message: Some(message.into()),
            status: None,
            exit_code: None,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            kind: EntryKind::Info,
            timestamp,
            message: Some(message.into()),
            status: None,
            exit_code: None,
        }
    }

    #[must_use]
    pub fn status_change(
        status: JobStatus,
        message: impl Into<String>,
        timestamp: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            kind: EntryKind::Status,
            timestamp,
            message: Some(message.into()),
            status: Some(status),
            exit_code,
        }
    }

    /// Reconnection and historical replay can resend entries already seen;
    /// two entries are the same event when message and timestamp both match.
    #[must_use]
    pub fn same_identity(&self, other: &LogEntry) -> bool {
        self.message == other.message && self.timestamp == other.timestamp
    }
}

#[derive(Debug, Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: WirePayload,
}

#[derive(Debug, Default, Deserialize)]
struct WirePayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    exit_code: Option<i32>,
}

/// Parse one channel frame. Malformed frames are logged and dropped without
/// tearing down the channel.
pub fn parse_frame(raw: &str) -> Option<LogEntry> {
    let frame = match serde_json::from_str::<WireFrame>(raw) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(%error, "dropping malformed log frame");
            return None;
        }
    };

    let kind = match frame.kind.as_str() {
        "log" => EntryKind::Log,
        "status" => EntryKind::Status,
        "info" => EntryKind::Info,
        "error" => EntryKind::Error,
        "system" => EntryKind::System,
        other => {
            warn!(frame_type = other, "dropping log frame with unknown type");
            return None;
        }
    };

    Some(LogEntry {
        kind,
        timestamp: frame.payload.ts,
        message: frame.payload.message,
        status: frame.payload.status.as_deref().and_then(JobStatus::parse),
        exit_code: frame.payload.exit_code,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_frame, EntryKind, LogEntry};
    use crate::status::JobStatus;

    #[test]
    fn frame_parse_maps_log_payload() {
        let entry = parse_frame(r#"{"type":"log","payload":{"message":"hello","ts":"t1"}}"#)
            .expect("valid frame");
        assert_eq!(entry.kind, EntryKind::Log);
        assert_eq!(entry.message.as_deref(), Some("hello"));
        assert_eq!(entry.timestamp.as_deref(), Some("t1"));
        assert_eq!(entry.status, None);
    }

    #[test]
    fn frame_parse_maps_status_payload_with_exit_code() {
        let entry = parse_frame(
            r#"{"type":"status","payload":{"status":"SUCCEEDED","exit_code":0,"ts":"t9"}}"#,
        )
        .expect("valid frame");
        assert_eq!(entry.kind, EntryKind::Status);
        assert_eq!(entry.status, Some(JobStatus::Succeeded));
        assert_eq!(entry.exit_code, Some(0));
    }

    #[test]
    fn frame_parse_tolerates_missing_payload() {
        let entry = parse_frame(r#"{"type":"system"}"#).expect("valid frame");
        assert_eq!(entry.kind, EntryKind::System);
        assert_eq!(entry.message, None);
    }

    #[test]
    fn frame_parse_drops_malformed_and_unknown_frames() {
        assert_eq!(parse_frame("not json"), None);
        assert_eq!(parse_frame(r#"{"payload":{}}"#), None);
        assert_eq!(parse_frame(r#"{"type":"telemetry","payload":{}}"#), None);
    }

    #[test]
    fn entry_identity_is_the_message_timestamp_pair() {
        let a = LogEntry::log("same", Some("t1".to_owned()));
        let b = LogEntry::info("same", Some("t1".to_owned()));
        let c = LogEntry::log("same", Some("t2".to_owned()));
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
    }
}
