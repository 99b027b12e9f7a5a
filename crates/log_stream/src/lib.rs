//! Live log-stream synchronization for observed jobs.
//!
//! One job id is observed at a time. The synchronizer keeps exactly one live
//! or cached view of that job's log output and terminal status: it restores
//! cached entries on re-observation, backfills history for jobs that already
//! finished, deduplicates replayed events, and reports disconnection as a
//! status value rather than an error.
//!
//! The state machine ([`sync::LogSync`]) is pure and synchronous; channel I/O
//! sits behind the [`channel::ChannelFactory`] seam so the whole protocol can
//! be driven in tests without a live connection.

pub mod cache;
pub mod channel;
pub mod driver;
pub mod entry;
pub mod job;
pub mod status;
pub mod sync;
pub mod ws;

pub use cache::{CachedChannel, LogCache};
pub use channel::{ChannelEvent, ChannelFactory, LogChannel};
pub use driver::{LogStreamHandle, StreamDeps};
pub use entry::{parse_frame, EntryKind, LogEntry};
pub use job::{synthesize_backfill, JobApi, JobRecord};
pub use status::{JobStatus, StreamStatus};
pub use sync::{LogSync, LogView, SyncPlan};
pub use ws::WsChannelFactory;
