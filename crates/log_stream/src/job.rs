use futures_util::future::BoxFuture;
use serde::Deserialize;

use crate::entry::LogEntry;
use crate::status::JobStatus;

/// Snapshot of a job as reported by the jobs resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub status: JobStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub log_snippet: Option<String>,
    #[serde(default)]
    pub result_message: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

/// Read-only jobs resource consumed by the historical fast path.
pub trait JobApi: Send + Sync {
    fn fetch_job(&self, job_id: &str) -> BoxFuture<'static, Result<JobRecord, String>>;
}

/// Synthesize the backfill for a job discovered to have already finished,
/// so no channel is ever opened for output that will never grow.
#[must_use]
pub fn synthesize_backfill(record: &JobRecord) -> Vec<LogEntry> {
    let mut entries = Vec::new();

    if let Some(ts) = &record.submitted_at {
        entries.push(LogEntry::info("Job submitted", Some(ts.clone())));
    }
    if let Some(ts) = &record.started_at {
        entries.push(LogEntry::info("Job started", Some(ts.clone())));
    }
    if let Some(snippet) = &record.log_snippet {
        for line in snippet.lines().filter(|line| !line.trim().is_empty()) {
            entries.push(LogEntry::log(line, None));
        }
    }

    let summary = record
        .result_message
        .clone()
        .unwrap_or_else(|| format!("Job finished with status {}", record.status.as_str()));
    entries.push(LogEntry::status_change(
        record.status,
        summary,
        record.completed_at.clone(),
        record.exit_code,
    ));

    entries
}

#[cfg(test)]
mod tests {
    use super::{synthesize_backfill, JobRecord};
    use crate::entry::EntryKind;
    use crate::status::JobStatus;

    #[test]
    fn backfill_orders_lifecycle_then_output_then_outcome() {
        let record = JobRecord {
            status: JobStatus::Succeeded,
            submitted_at: Some("t1".to_owned()),
            started_at: Some("t2".to_owned()),
            completed_at: Some("t9".to_owned()),
            log_snippet: Some("first line\n\nsecond line\n".to_owned()),
            result_message: Some("all good".to_owned()),
            exit_code: Some(0),
        };

        let entries = synthesize_backfill(&record);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].kind, EntryKind::Info);
        assert_eq!(entries[2].message.as_deref(), Some("first line"));
        assert_eq!(entries[3].message.as_deref(), Some("second line"));

        let outcome = &entries[4];
        assert_eq!(outcome.kind, EntryKind::Status);
        assert_eq!(outcome.status, Some(JobStatus::Succeeded));
        assert_eq!(outcome.message.as_deref(), Some("all good"));
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[test]
    fn backfill_for_a_bare_record_still_reports_the_outcome() {
        let record = JobRecord {
            status: JobStatus::Failed,
            submitted_at: None,
            started_at: None,
            completed_at: None,
            log_snippet: None,
            result_message: None,
            exit_code: Some(3),
        };

        let entries = synthesize_backfill(&record);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].message.as_deref(),
            Some("Job finished with status FAILED")
        );
    }

    #[test]
    fn job_record_deserializes_from_resource_payload() {
        let record: JobRecord = serde_json::from_str(
            r#"{"status":"TIMED_OUT","completedAt":"t5","exitCode":124,"logSnippet":"x"}"#,
        )
        .expect("job payload");
        assert_eq!(record.status, JobStatus::TimedOut);
        assert_eq!(record.completed_at.as_deref(), Some("t5"));
        assert_eq!(record.exit_code, Some(124));
    }
}
