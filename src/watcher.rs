use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::aggregate::{shared_aggregator, AggregateState, SharedAggregator};
use crate::config::TrackerConfig;
use crate::diff::DiffEngine;
use crate::error::{TrackerError, TrackerResult};
use crate::events::{FsEvent, FsEventKind, WatchUpdate};
use crate::filter::FileFilter;
use crate::processor::EventProcessor;
use crate::snapshot::SnapshotStore;
use crate::spell::SpellFlagger;

/// Messages consumed by the processing worker.
enum WorkerMessage {
    Notify(notify::Result<Event>),
    Shutdown,
}

/// Lifecycle of a `DirectoryWatcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching { root: PathBuf },
}

struct ActiveWatch {
    root: PathBuf,
    watcher: RecommendedWatcher,
    worker_tx: Sender<WorkerMessage>,
    worker: JoinHandle<()>,
}

/// Watches a directory tree and turns modifications into change updates.
///
/// Notifications are forwarded from notify's callback into a channel and
/// processed by a single worker thread, so events for a path are handled in
/// the order they were delivered. Updates for the presentation layer are
/// read with `recv`, `try_recv` or `recv_timeout`.
pub struct DirectoryWatcher {
    config: TrackerConfig,
    flagger: SpellFlagger,
    snapshots: SnapshotStore,
    aggregator: SharedAggregator,
    active: Option<ActiveWatch>,
    update_tx: Sender<WatchUpdate>,
    update_rx: Receiver<WatchUpdate>,
}

impl DirectoryWatcher {
    pub fn new(config: TrackerConfig) -> Self {
        let flagger = SpellFlagger::from_config(&config.spelling);
        Self::with_flagger(config, flagger)
    }

    pub fn with_flagger(config: TrackerConfig, flagger: SpellFlagger) -> Self {
        let (update_tx, update_rx) = mpsc::channel();
        Self {
            config,
            flagger,
            snapshots: SnapshotStore::new(),
            aggregator: shared_aggregator(),
            active: None,
            update_tx,
            update_rx,
        }
    }

    /// Starts monitoring `root`, replacing any current session.
    ///
    /// The new subscription is made before the current session is stopped,
    /// so a failed start leaves the current session and its totals intact.
    /// Every failure is also pushed as `WatchUpdate::Rejected`.
    pub fn start<P: AsRef<Path>>(&mut self, root: P) -> TrackerResult<()> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(self.reject(TrackerError::invalid_root(root)));
        }

        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let filter = match FileFilter::new(&root, &self.config.watcher) {
            Ok(filter) => filter,
            Err(err) => return Err(self.reject(err)),
        };

        let (worker_tx, worker_rx) = mpsc::channel::<WorkerMessage>();
        let watcher = match subscribe(&root, worker_tx.clone()) {
            Ok(watcher) => watcher,
            Err(err) => return Err(self.reject(err)),
        };

        if self.is_watching() {
            self.stop();
        }
        self.snapshots.clear();
        self.aggregator.lock().reset();

        let engine = DiffEngine::new(self.config.diff.algorithm);
        tracing::debug!(
            "Diffing with {}: {}",
            engine.algorithm_name(),
            engine.algorithm_description()
        );

        let processor = EventProcessor::new(
            self.snapshots.clone(),
            Arc::clone(&self.aggregator),
            engine,
            self.flagger.clone(),
            filter,
        );
        let update_tx = self.update_tx.clone();
        let worker = thread::spawn(move || run_worker(worker_rx, processor, update_tx));

        tracing::info!("Started monitoring {}", root.display());
        self.notify(WatchUpdate::Started { root: root.clone() });

        self.active = Some(ActiveWatch {
            root,
            watcher,
            worker_tx,
            worker,
        });
        Ok(())
    }

    /// Stops monitoring and waits for queued events to be processed.
    ///
    /// Snapshots are kept until the next `start`. Does nothing when idle.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let ActiveWatch {
            root,
            mut watcher,
            worker_tx,
            worker,
        } = active;

        if let Err(err) = watcher.unwatch(&root) {
            tracing::debug!("Unwatch of {} failed: {}", root.display(), err);
        }
        drop(watcher);

        // Queued behind any events still waiting in the channel.
        let _ = worker_tx.send(WorkerMessage::Shutdown);
        if worker.join().is_err() {
            tracing::error!("Event worker for {} panicked", root.display());
        }

        tracing::info!("Stopped monitoring {}", root.display());
        self.notify(WatchUpdate::Stopped);
    }

    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> WatchState {
        match &self.active {
            Some(active) => WatchState::Watching {
                root: active.root.clone(),
            },
            None => WatchState::Idle,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.active.as_ref().map(|active| active.root.as_path())
    }

    /// Set when spell checking had to be turned off, e.g. a missing dictionary.
    pub fn spelling_notice(&self) -> Option<&str> {
        self.flagger.notice()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Copy of the current totals and log.
    pub fn aggregate(&self) -> AggregateState {
        self.aggregator.lock().state().clone()
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn try_recv(&self) -> Result<WatchUpdate, TryRecvError> {
        self.update_rx.try_recv()
    }

    pub fn recv(&self) -> Result<WatchUpdate, RecvError> {
        self.update_rx.recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<WatchUpdate, RecvTimeoutError> {
        self.update_rx.recv_timeout(timeout)
    }

    fn reject(&self, err: TrackerError) -> TrackerError {
        tracing::warn!("Cannot start monitoring: {}", err);
        self.notify(WatchUpdate::Rejected {
            reason: err.to_string(),
        });
        err
    }

    fn notify(&self, update: WatchUpdate) {
        // The receiver lives in `self`, so this cannot fail.
        let _ = self.update_tx.send(update);
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Subscribes to recursive notifications under `root`, forwarding them to
/// the worker channel.
fn subscribe(root: &Path, worker_tx: Sender<WorkerMessage>) -> TrackerResult<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // The worker may already be gone during shutdown.
        let _ = worker_tx.send(WorkerMessage::Notify(res));
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;
    Ok(watcher)
}

fn run_worker(rx: Receiver<WorkerMessage>, processor: EventProcessor, updates: Sender<WatchUpdate>) {
    while let Ok(message) = rx.recv() {
        let event = match message {
            WorkerMessage::Notify(Ok(event)) => event,
            WorkerMessage::Notify(Err(err)) => {
                tracing::error!("File watcher error: {}", err);
                continue;
            }
            WorkerMessage::Shutdown => break,
        };

        for fs_event in translate_event(&event) {
            if let Some(change) = processor.process(&fs_event) {
                let update = WatchUpdate::Changed {
                    event: change.event,
                    totals: change.totals,
                };
                if updates.send(update).is_err() {
                    return; // Receiver dropped, exit thread
                }
            }
        }
    }
}

/// Maps a notify event to zero or more tracker events.
///
/// Renames become a deletion of the old path and a creation of the new one.
/// Unclassified changes count as modifications. Access notifications are
/// dropped.
pub fn translate_event(event: &Event) -> Vec<FsEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => FsEventKind::Created,
        EventKind::Remove(_) => FsEventKind::Deleted,
        EventKind::Modify(ModifyKind::Name(mode)) => return translate_rename(mode, &event.paths),
        EventKind::Modify(_) | EventKind::Any => FsEventKind::Modified,
        EventKind::Access(_) | EventKind::Other => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| classify(kind, path))
        .collect()
}

fn translate_rename(mode: RenameMode, paths: &[PathBuf]) -> Vec<FsEvent> {
    match (mode, paths) {
        (RenameMode::Both, [from, to]) => vec![
            classify(FsEventKind::Deleted, from),
            classify(FsEventKind::Created, to),
        ],
        (RenameMode::From, _) => paths
            .iter()
            .map(|path| classify(FsEventKind::Deleted, path))
            .collect(),
        // Without a From/To pairing the path's existence decides.
        _ => paths
            .iter()
            .map(|path| {
                if path.exists() {
                    classify(FsEventKind::Created, path)
                } else {
                    classify(FsEventKind::Deleted, path)
                }
            })
            .collect(),
    }
}

fn classify(kind: FsEventKind, path: &Path) -> FsEvent {
    let is_directory = match kind {
        FsEventKind::Deleted => false,
        _ => path.is_dir(),
    };
    FsEvent {
        kind,
        path: path.to_path_buf(),
        is_directory,
    }
}
