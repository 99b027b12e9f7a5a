//! Client core for the ops console.
//!
//! The console UI talks to the job service through two cooperating pieces:
//! an authenticated transport that transparently refreshes the session
//! credential (`auth_transport`), and a per-job log stream synchronizer
//! (`log_stream`). Both share one session store (`session_state`). This crate
//! wires them together and hosts the minimal jobs resource client the
//! synchronizer needs for historical backfill.

mod client;
mod config;
mod error;
mod jobs;

pub use client::ConsoleClient;
pub use config::ConsoleConfig;
pub use error::ConsoleError;
pub use jobs::JobsClient;

pub use auth_transport::{ApiRequest, ApiResponse, Navigator, NoopNavigator, TransportError};
pub use log_stream::{JobStatus, LogEntry, LogStreamHandle, LogView, StreamStatus};
pub use session_state::{SessionStore, UserSummary};
