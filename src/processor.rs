//! Per-event pipeline: read, compare with the snapshot, diff, flag, record.

use std::path::Path;

use crate::aggregate::{AggregateTotals, SharedAggregator};
use crate::diff::DiffEngine;
use crate::error::{TrackerError, TrackerResult};
use crate::events::{ChangeEvent, FsEvent, FsEventKind};
use crate::filter::FileFilter;
use crate::snapshot::SnapshotStore;
use crate::spell::SpellFlagger;

/// Outcome of a processed modification.
#[derive(Debug, Clone)]
pub struct ProcessedChange {
    pub event: ChangeEvent,
    pub totals: AggregateTotals,
}

/// Applies file system events to the snapshot store and aggregator.
///
/// Events must be fed in arrival order for any given path; the processor
/// itself holds no per-event state beyond the shared store.
#[derive(Debug)]
pub struct EventProcessor {
    snapshots: SnapshotStore,
    aggregator: SharedAggregator,
    engine: DiffEngine,
    flagger: SpellFlagger,
    filter: FileFilter,
}

impl EventProcessor {
    pub fn new(
        snapshots: SnapshotStore,
        aggregator: SharedAggregator,
        engine: DiffEngine,
        flagger: SpellFlagger,
        filter: FileFilter,
    ) -> Self {
        Self {
            snapshots,
            aggregator,
            engine,
            flagger,
            filter,
        }
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Handles one event. Every readable modification yields a
    /// `ProcessedChange`, even when the content is unchanged.
    pub fn process(&self, event: &FsEvent) -> Option<ProcessedChange> {
        // A deleted path may have been a directory, so forget anything below it too.
        if event.kind == FsEventKind::Deleted {
            self.forget(&event.path);
            return None;
        }

        if event.is_directory || !self.filter.should_track(&event.path, false) {
            return None;
        }

        match event.kind {
            FsEventKind::Created => {
                match read_content(&event.path) {
                    Ok(content) => self.snapshots.put(event.path.clone(), content),
                    Err(err) => tracing::debug!("Dropping create event: {}", err),
                }
                None
            }
            FsEventKind::Modified => match read_content(&event.path) {
                Ok(content) => Some(self.apply_modification(&event.path, content)),
                Err(err) => {
                    tracing::debug!("Dropping modify event: {}", err);
                    None
                }
            },
            FsEventKind::Deleted => None,
        }
    }

    fn forget(&self, path: &Path) {
        if self.snapshots.remove(path).is_some() {
            tracing::debug!("Stopped tracking {}", path.display());
        }
        let nested = self.snapshots.remove_under(path);
        if nested > 0 {
            tracing::debug!("Stopped tracking {} files under {}", nested, path.display());
        }
    }

    fn apply_modification(&self, path: &Path, new_content: String) -> ProcessedChange {
        let old_content = self.snapshots.get(path);
        let delta = self.engine.diff(&old_content, &new_content);
        let misspellings = self.flagger.flag(&delta.added_text);

        let (event, totals) = {
            let mut aggregator = self.aggregator.lock();
            let event = aggregator.record(path, delta.added_text, delta.deleted_text);
            (event, aggregator.totals())
        };
        self.snapshots.put(path, new_content);

        tracing::debug!("{}", event.summary());

        ProcessedChange {
            event: event.with_misspellings(misspellings),
            totals,
        }
    }
}

/// Reads a file as text, replacing invalid UTF-8.
pub fn read_content(path: &Path) -> TrackerResult<String> {
    let bytes = std::fs::read(path).map_err(|source| TrackerError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
