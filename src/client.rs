use std::sync::Arc;

use auth_transport::{AuthTransport, Navigator};
use log_stream::{ChannelFactory, JobApi, LogStreamHandle, StreamDeps, WsChannelFactory};
use session_state::SessionStore;

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::jobs::JobsClient;

/// Wires the session store, the authenticated transport, and the log stream
/// factory into one client the console shell can hold for its lifetime.
pub struct ConsoleClient {
    config: ConsoleConfig,
    session: Arc<SessionStore>,
    transport: Arc<AuthTransport>,
    jobs: Arc<JobsClient>,
}

impl ConsoleClient {
    /// Builds the client, restoring the persisted session profile when one is
    /// configured.
    pub fn new(config: ConsoleConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ConsoleError> {
        let session = match &config.profile_path {
            Some(path) => Arc::new(SessionStore::load(path)?),
            None => Arc::new(SessionStore::in_memory()),
        };
        let transport = Arc::new(AuthTransport::new(
            config.transport_config(),
            Arc::clone(&session),
            navigator,
        )?);
        let jobs = Arc::new(JobsClient::new(Arc::clone(&transport)));

        Ok(Self {
            config,
            session,
            transport,
            jobs,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn transport(&self) -> &Arc<AuthTransport> {
        &self.transport
    }

    pub fn jobs(&self) -> &Arc<JobsClient> {
        &self.jobs
    }

    /// Spawns a log stream bound to this client's session and channel origin.
    #[must_use]
    pub fn log_stream(&self) -> LogStreamHandle {
        LogStreamHandle::spawn(StreamDeps {
            session: Arc::clone(&self.session),
            jobs: Arc::clone(&self.jobs) as Arc<dyn JobApi>,
            channels: Arc::new(WsChannelFactory::new(self.config.channel_base()))
                as Arc<dyn ChannelFactory>,
        })
    }

    /// Persists the session profile. Call once at application shutdown;
    /// a client without a profile path has nothing to save.
    pub fn shutdown(&self) -> Result<(), ConsoleError> {
        if self.config.profile_path.is_some() {
            self.session.save()?;
        }
        Ok(())
    }
}
