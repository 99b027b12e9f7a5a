use futures_util::future::BoxFuture;

use crate::entry::LogEntry;

/// Event surfaced by one job log connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Parsed frame delivered by the connection.
    Frame(LogEntry),
    /// The connection closed; `normal` marks a clean closure.
    Closed { normal: bool },
    /// Connection-level failure.
    Failed(String),
}

/// One live connection to a job's log endpoint.
pub trait LogChannel: Send {
    /// Next event, or `None` once the connection is exhausted.
    fn next_event(&mut self) -> BoxFuture<'_, Option<ChannelEvent>>;

    /// Closes the underlying connection.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// Opens channels for observed jobs. Injectable so the synchronizer can be
/// driven in tests without a live connection.
pub trait ChannelFactory: Send + Sync {
    fn connect(
        &self,
        job_id: &str,
        token: &str,
    ) -> BoxFuture<'static, Result<Box<dyn LogChannel>, String>>;
}
