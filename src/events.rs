use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateTotals;
use crate::diff::char_count;

/// Kind of a raw file system notification, as the tracker sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FsEventKind {
    Created,
    Modified,
    Deleted,
}

/// A file system notification for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: FsEventKind,
    pub path: PathBuf,
    pub is_directory: bool,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            is_directory: false,
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Created, path)
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Modified, path)
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Deleted, path)
    }

    pub fn directory(mut self) -> Self {
        self.is_directory = true;
        self
    }
}

/// Quantified result of diffing a file's previous and current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub added_text: String,
    pub deleted_text: String,
    pub added_count: usize,
    pub deleted_count: usize,
    pub misspellings: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(path: PathBuf, added_text: String, deleted_text: String) -> Self {
        Self {
            added_count: char_count(&added_text),
            deleted_count: char_count(&deleted_text),
            path,
            added_text,
            deleted_text,
            misspellings: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    pub fn with_misspellings(mut self, misspellings: Vec<String>) -> Self {
        self.misspellings = misspellings;
        self
    }

    /// One-line description used in the change log.
    pub fn summary(&self) -> String {
        format!(
            "{} characters added, {} characters deleted in {}",
            self.added_count,
            self.deleted_count,
            self.path.display()
        )
    }
}

/// Updates pushed from the watcher to the presentation layer.
#[derive(Debug, Clone)]
pub enum WatchUpdate {
    Started { root: PathBuf },
    Changed { event: ChangeEvent, totals: AggregateTotals },
    Stopped,
    Rejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_counts_characters() {
        let event = ChangeEvent::new(
            PathBuf::from("f.txt"),
            "world\n".to_string(),
            "ünï\n".to_string(),
        );

        assert_eq!(event.added_count, 6);
        assert_eq!(event.deleted_count, 4);
        assert!(event.misspellings.is_empty());
    }

    #[test]
    fn test_change_event_summary() {
        let event = ChangeEvent::new(PathBuf::from("notes/f.txt"), "abc".to_string(), String::new());
        assert_eq!(event.summary(), "3 characters added, 0 characters deleted in notes/f.txt");
    }

    #[test]
    fn test_change_event_with_misspellings() {
        let event = ChangeEvent::new(PathBuf::from("f.txt"), "helo".to_string(), String::new())
            .with_misspellings(vec!["Misspelled word: helo".to_string()]);

        assert_eq!(event.misspellings, vec!["Misspelled word: helo"]);
    }

    #[test]
    fn test_change_event_json() {
        let event = ChangeEvent::new(PathBuf::from("f.txt"), "x\n".to_string(), String::new());
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"added_count\":2"));
        assert!(json.contains("\"recorded_at\""));
    }

    #[test]
    fn test_fs_event_builders() {
        let event = FsEvent::created("dir").directory();
        assert_eq!(event.kind, FsEventKind::Created);
        assert!(event.is_directory);
        assert!(!FsEvent::deleted("f.txt").is_directory);
    }
}
