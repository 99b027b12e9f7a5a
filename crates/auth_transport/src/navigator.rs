use tracing::debug;

/// Seam for the login redirect that follows an unrecoverable session failure.
///
/// The transport never decides how navigation happens; the embedding shell
/// provides it. The redirect is skipped when the user is already on the login
/// surface.
pub trait Navigator: Send + Sync {
    /// True when the login surface is already active.
    fn at_login(&self) -> bool;

    /// Switches to the login surface.
    fn goto_login(&self);
}

/// Navigator for headless embedders. Records the intent in the log and leaves
/// the surface alone.
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn at_login(&self) -> bool {
        false
    }

    fn goto_login(&self) {
        debug!("session expired; login redirect requested");
    }
}
