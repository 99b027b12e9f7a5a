use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::SessionStateError;
use crate::schema::{ProfileDocument, UserSummary};

/// In-memory session state. Invariant: `access_token == None` implies
/// `authenticated == false`; the only mutators are `login`, `set_token`, and
/// `logout`, each of which holds the write lock for its whole transition.
#[derive(Debug, Default, Clone)]
struct Session {
    access_token: Option<String>,
    user: Option<UserSummary>,
    authenticated: bool,
}

#[derive(Debug)]
pub struct SessionStore {
    state: RwLock<Session>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store with no persistence boundary. Used by tests and short-lived tools.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(Session::default()),
            path: None,
        }
    }

    /// Opens the store against a profile file, restoring the persisted user
    /// summary when the file exists. The access token is never persisted, so a
    /// freshly loaded store is always unauthenticated.
    pub fn load(path: &Path) -> Result<Self, SessionStateError> {
        let user = match fs::read_to_string(path) {
            Ok(raw) => {
                let document = serde_json::from_str::<ProfileDocument>(&raw).map_err(|source| {
                    SessionStateError::ProfileParse {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                if document.version != 1 {
                    return Err(SessionStateError::UnsupportedVersion {
                        path: path.to_path_buf(),
                        found: document.version,
                    });
                }
                document.user
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(SessionStateError::io("reading session profile", path, source)),
        };

        Ok(Self {
            state: RwLock::new(Session {
                access_token: None,
                user,
                authenticated: false,
            }),
            path: Some(path.to_path_buf()),
        })
    }

    /// Writes the persisted slice of the session (user summary only).
    pub fn save(&self) -> Result<(), SessionStateError> {
        let path = self.path.as_ref().ok_or(SessionStateError::MissingProfilePath)?;
        let document = ProfileDocument::v1(self.user());
        let raw = serde_json::to_string_pretty(&document)
            .map_err(|source| SessionStateError::ProfileSerialize { source })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SessionStateError::io("creating profile directory", parent, source))?;
        }
        fs::write(path, raw)
            .map_err(|source| SessionStateError::io("writing session profile", path, source))
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        read_unpoisoned(&self.state).access_token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserSummary> {
        read_unpoisoned(&self.state).user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        read_unpoisoned(&self.state).authenticated
    }

    /// Records a successful login.
    pub fn login(&self, user: UserSummary, token: impl Into<String>) {
        let mut state = write_unpoisoned(&self.state);
        state.user = Some(user);
        state.access_token = Some(token.into());
        state.authenticated = true;
    }

    /// Installs a credential obtained from a successful refresh.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut state = write_unpoisoned(&self.state);
        state.access_token = Some(token.into());
        state.authenticated = true;
    }

    /// Clears the credential and the authenticated flag in one transition.
    /// The user summary stays behind as a re-login hint; see `clear_user`.
    pub fn logout(&self) {
        let mut state = write_unpoisoned(&self.state);
        state.access_token = None;
        state.authenticated = false;
    }

    pub fn clear_user(&self) {
        write_unpoisoned(&self.state).user = None;
    }
}

fn read_unpoisoned<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_unpoisoned<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use crate::schema::UserSummary;

    #[test]
    fn logout_clears_token_and_flag_together() {
        let store = SessionStore::in_memory();
        store.login(UserSummary::new("u1", "ops"), "tok");
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok"));

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn set_token_marks_session_authenticated() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        store.set_token("restored");
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("restored"));
    }

    #[test]
    fn logout_keeps_user_summary() {
        let store = SessionStore::in_memory();
        store.login(UserSummary::new("u1", "ops"), "tok");
        store.logout();
        assert_eq!(store.user().map(|user| user.username), Some("ops".to_owned()));

        store.clear_user();
        assert_eq!(store.user(), None);
    }
}
