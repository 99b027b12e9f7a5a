use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStateError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse session profile at {path}: {source}")]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize session profile: {source}")]
    ProfileSerialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("session profile at {path} has unsupported version {found}; expected 1")]
    UnsupportedVersion { path: PathBuf, found: u32 },

    #[error("session store has no profile path configured")]
    MissingProfilePath,
}

impl SessionStateError {
    pub(crate) fn io(operation: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}
