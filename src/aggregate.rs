//! Running totals and change log for a monitoring session.
//!
//! The aggregator owns the only `AggregateState`. The watcher shares it
//! behind a mutex so the presentation layer can take consistent copies while
//! events are being recorded.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::events::ChangeEvent;

/// Totals and ordered log accumulated since monitoring last started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateState {
    pub total_added: usize,
    pub total_deleted: usize,
    pub log: Vec<String>,
}

impl AggregateState {
    pub fn totals(&self) -> AggregateTotals {
        AggregateTotals {
            total_added: self.total_added,
            total_deleted: self.total_deleted,
        }
    }
}

/// Character totals without the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub total_added: usize,
    pub total_deleted: usize,
}

impl AggregateTotals {
    pub fn is_empty(&self) -> bool {
        self.total_added == 0 && self.total_deleted == 0
    }

    /// Share of added characters in percent, `None` before any change.
    pub fn added_percent(&self) -> Option<f64> {
        let total = self.total_added + self.total_deleted;
        if total == 0 {
            None
        } else {
            Some(self.total_added as f64 * 100.0 / total as f64)
        }
    }

    pub fn deleted_percent(&self) -> Option<f64> {
        self.added_percent().map(|added| 100.0 - added)
    }
}

#[derive(Debug, Default)]
pub struct ChangeAggregator {
    state: AggregateState,
}

impl ChangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one delta into the totals and log.
    pub fn record(
        &mut self,
        path: impl Into<PathBuf>,
        added_text: impl Into<String>,
        deleted_text: impl Into<String>,
    ) -> ChangeEvent {
        let event = ChangeEvent::new(path.into(), added_text.into(), deleted_text.into());

        self.state.total_added += event.added_count;
        self.state.total_deleted += event.deleted_count;
        self.state.log.push(event.summary());

        event
    }

    pub fn reset(&mut self) {
        self.state = AggregateState::default();
    }

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn totals(&self) -> AggregateTotals {
        self.state.totals()
    }
}

/// Aggregator shared between the event worker and readers.
pub type SharedAggregator = Arc<Mutex<ChangeAggregator>>;

pub fn shared_aggregator() -> SharedAggregator {
    Arc::new(Mutex::new(ChangeAggregator::new()))
}
