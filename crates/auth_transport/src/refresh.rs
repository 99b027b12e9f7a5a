use std::fmt;
use std::sync::{Mutex, MutexGuard};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;

/// Refresh failure fanned out to every request attached to one refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    message: String,
}

impl RefreshFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type SharedRefresh = Shared<BoxFuture<'static, Result<String, RefreshFailure>>>;

/// At most one refresh call may be outstanding per transport.
///
/// The slot is claimed under the lock before the refresh future is first
/// polled, so every concurrent authorization failure after the first observes
/// the in-flight refresh and attaches to it. The slot is cleared once the call
/// settles, success or failure, so the next authorization failure starts a
/// fresh call.
#[derive(Default)]
pub struct RefreshGate {
    slot: Mutex<Option<SharedRefresh>>,
}

impl RefreshGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a refresh call is outstanding.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        lock_unpoisoned(&self.slot).is_some()
    }

    /// Attach to the in-flight refresh, or start one via `start`.
    pub async fn run<F>(&self, start: F) -> Result<String, RefreshFailure>
    where
        F: FnOnce() -> BoxFuture<'static, Result<String, RefreshFailure>>,
    {
        let attached = {
            let mut slot = lock_unpoisoned(&self.slot);
            match slot.as_ref() {
                Some(in_flight) => in_flight.clone(),
                None => {
                    let started = start().shared();
                    *slot = Some(started.clone());
                    started
                }
            }
        };

        let outcome = attached.clone().await;

        // Clear only our own settled call; a newer refresh may already occupy
        // the slot by the time a late waiter wakes up.
        let mut slot = lock_unpoisoned(&self.slot);
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&attached)) {
            *slot = None;
        }
        drop(slot);

        outcome
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
