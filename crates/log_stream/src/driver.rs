use std::sync::Arc;

use session_state::SessionStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::channel::{ChannelEvent, ChannelFactory, LogChannel};
use crate::job::{synthesize_backfill, JobApi};
use crate::sync::{LogSync, LogView, SyncPlan};

/// Collaborators injected into the synchronizer driver.
pub struct StreamDeps {
    pub session: Arc<SessionStore>,
    pub jobs: Arc<dyn JobApi>,
    pub channels: Arc<dyn ChannelFactory>,
}

/// Consumer surface for one log stream.
///
/// The observed job id is the only input; start and stop are implicit in its
/// lifecycle. Output is a stream of `(entries, status)` snapshots.
pub struct LogStreamHandle {
    job_tx: watch::Sender<Option<String>>,
    view_rx: watch::Receiver<LogView>,
    task: JoinHandle<()>,
}

impl LogStreamHandle {
    /// Spawns the driver task. The stream idles until `observe` supplies a job.
    #[must_use]
    pub fn spawn(deps: StreamDeps) -> Self {
        let (job_tx, job_rx) = watch::channel(None);
        let (view_tx, view_rx) = watch::channel(LogView::default());
        let task = tokio::spawn(drive(deps, job_rx, view_tx));

        Self {
            job_tx,
            view_rx,
            task,
        }
    }

    /// Switches the observed job. `None` parks the stream in idle.
    pub fn observe(&self, job_id: Option<String>) {
        let _ = self.job_tx.send(job_id);
    }

    /// Receiver over `(entries, status)` snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LogView> {
        self.view_rx.clone()
    }

    /// Latest snapshot.
    #[must_use]
    pub fn view(&self) -> LogView {
        self.view_rx.borrow().clone()
    }
}

impl Drop for LogStreamHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

enum DriverInput {
    JobChanged,
    Channel(u64, Option<ChannelEvent>),
}

type OpenChannel = Option<(u64, Box<dyn LogChannel>)>;

async fn drive(
    deps: StreamDeps,
    mut job_rx: watch::Receiver<Option<String>>,
    view_tx: watch::Sender<LogView>,
) {
    let mut sync = LogSync::new();
    let mut channel: OpenChannel = None;

    loop {
        let input = match channel.as_mut() {
            Some((generation, open)) => {
                let generation = *generation;
                tokio::select! {
                    changed = job_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        DriverInput::JobChanged
                    }
                    event = open.next_event() => DriverInput::Channel(generation, event),
                }
            }
            None => {
                if job_rx.changed().await.is_err() {
                    break;
                }
                DriverInput::JobChanged
            }
        };

        match input {
            DriverInput::JobChanged => {
                let next = job_rx.borrow_and_update().clone();
                teardown(&mut channel).await;

                let plan = sync.set_job(next, deps.session.token().is_some());
                publish(&view_tx, &sync);

                match plan {
                    SyncPlan::Idle | SyncPlan::Settled => {}
                    SyncPlan::Resume { generation } => {
                        open_channel(&deps, &mut sync, &mut channel, generation, &view_tx).await;
                    }
                    SyncPlan::Connect { generation } => {
                        backfill_then_connect(&deps, &mut sync, &mut channel, generation, &view_tx)
                            .await;
                    }
                }
            }
            DriverInput::Channel(generation, event) => {
                handle_channel_event(&mut sync, &mut channel, generation, event, &view_tx);
            }
        }
    }

    teardown(&mut channel).await;
}

/// Fast path for jobs that already finished: a one-time historical fetch can
/// settle the stream without ever opening a channel. Any other outcome falls
/// through to the live channel, which delivers history itself.
async fn backfill_then_connect(
    deps: &StreamDeps,
    sync: &mut LogSync,
    channel: &mut OpenChannel,
    generation: u64,
    view_tx: &watch::Sender<LogView>,
) {
    let Some(job_id) = sync.job_id().map(ToString::to_string) else {
        return;
    };

    match deps.jobs.fetch_job(&job_id).await {
        Ok(record) if record.status.is_terminal() => {
            let entries = synthesize_backfill(&record);
            if sync.apply_backfill(generation, entries, record.status) {
                publish(view_tx, sync);
                return;
            }
        }
        Ok(_) => {}
        Err(error) => {
            debug!(%error, job = %job_id, "historical fetch failed; continuing with live channel");
        }
    }

    open_channel(deps, sync, channel, generation, view_tx).await;
}

async fn open_channel(
    deps: &StreamDeps,
    sync: &mut LogSync,
    channel: &mut OpenChannel,
    generation: u64,
    view_tx: &watch::Sender<LogView>,
) {
    if !sync.is_current(generation) {
        return;
    }
    let Some(job_id) = sync.job_id().map(ToString::to_string) else {
        return;
    };
    let Some(token) = deps.session.token() else {
        // credential vanished since the job switch
        if sync.apply_error(generation) {
            publish(view_tx, sync);
        }
        return;
    };

    match deps.channels.connect(&job_id, &token).await {
        Ok(mut open) => {
            if sync.apply_connected(generation) {
                publish(view_tx, sync);
                *channel = Some((generation, open));
            } else {
                // the observed job moved on while we were connecting
                open.close().await;
            }
        }
        Err(error) => {
            warn!(%error, job = %job_id, "log channel connect failed");
            if sync.apply_error(generation) {
                publish(view_tx, sync);
            }
        }
    }
}

fn handle_channel_event(
    sync: &mut LogSync,
    channel: &mut OpenChannel,
    generation: u64,
    event: Option<ChannelEvent>,
    view_tx: &watch::Sender<LogView>,
) {
    match event {
        Some(ChannelEvent::Frame(entry)) => {
            if sync.apply_frame(generation, entry) {
                publish(view_tx, sync);
            }
        }
        Some(ChannelEvent::Closed { normal }) => {
            *channel = None;
            if sync.apply_close(generation, normal) {
                publish(view_tx, sync);
            }
        }
        Some(ChannelEvent::Failed(error)) => {
            warn!(%error, "log channel failure");
            *channel = None;
            if sync.apply_error(generation) {
                publish(view_tx, sync);
            }
        }
        None => {
            // the peer vanished without a close frame
            *channel = None;
            if sync.apply_close(generation, false) {
                publish(view_tx, sync);
            }
        }
    }
}

async fn teardown(channel: &mut OpenChannel) {
    if let Some((_, mut open)) = channel.take() {
        open.close().await;
    }
}

fn publish(view_tx: &watch::Sender<LogView>, sync: &LogSync) {
    let _ = view_tx.send(sync.view());
}
