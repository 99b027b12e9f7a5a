//! Authenticated transport for console API requests.
//!
//! Every outbound request carries the session's bearer credential; an
//! authorization failure triggers a coordinated, single-flight token refresh
//! followed by exactly one replay of the failing request. Callers see normal
//! responses, the original server error, or a distinguished
//! [`TransportError::SessionExpired`] once the session cannot be restored.
//!
//! The refresh call itself is issued outside the credential hooks, so a
//! rejected refresh can never recurse into another refresh attempt.

pub mod config;
pub mod error;
pub mod headers;
pub mod navigator;
pub mod refresh;
pub mod request;
pub mod transport;
pub mod url;

pub use config::TransportConfig;
pub use error::TransportError;
pub use navigator::{Navigator, NoopNavigator};
pub use refresh::{RefreshFailure, RefreshGate};
pub use request::{ApiRequest, ApiResponse};
pub use transport::AuthTransport;
pub use url::{join_url, normalize_base_url, DEFAULT_REFRESH_PATH};
