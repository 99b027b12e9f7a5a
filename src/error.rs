use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Transport(#[from] auth_transport::TransportError),

    #[error(transparent)]
    Session(#[from] session_state::SessionStateError),
}
