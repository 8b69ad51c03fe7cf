pub mod aggregate;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod events;
pub mod filter;
pub mod processor;
pub mod report;
pub mod snapshot;
pub mod spell;
pub mod tui;
pub mod watcher;

pub use aggregate::{AggregateState, AggregateTotals, ChangeAggregator, SharedAggregator};
pub use config::TrackerConfig;
pub use diff::{DiffAlgorithm, DiffAlgorithmType, DiffEngine, TextDelta};
pub use error::{TrackerError, TrackerResult};
pub use events::{ChangeEvent, FsEvent, FsEventKind, WatchUpdate};
pub use filter::FileFilter;
pub use processor::{EventProcessor, ProcessedChange};
pub use snapshot::{FileSnapshot, SnapshotStore};
pub use spell::{CachedSpellService, NoopSpellService, SpellFlagger, SpellService, WordListDictionary};
pub use watcher::{DirectoryWatcher, WatchState};
