//! End-of-session report export
//!
//! Writes the totals and change log of a monitoring session to a file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_added: usize,
    pub total_deleted: usize,
    pub log: Vec<String>,
}

impl SessionReport {
    pub fn new(root: PathBuf, started_at: DateTime<Utc>, state: &AggregateState) -> Self {
        Self {
            root,
            started_at,
            finished_at: Utc::now(),
            total_added: state.total_added,
            total_deleted: state.total_deleted,
            log: state.log.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize session report")
    }

    /// Export the report as pretty JSON
    pub fn write_to<P: AsRef<Path>>(&self, output_path: P) -> Result<()> {
        let output_path = output_path.as_ref();
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        fs::write(output_path, self.to_json()?)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

        tracing::info!("Session report written to {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state() -> AggregateState {
        AggregateState {
            total_added: 6,
            total_deleted: 2,
            log: vec!["6 characters added, 2 characters deleted in f.txt".to_string()],
        }
    }

    #[test]
    fn test_report_from_state() {
        let started = Utc::now();
        let report = SessionReport::new(PathBuf::from("/watched"), started, &state());

        assert_eq!(report.total_added, 6);
        assert_eq!(report.total_deleted, 2);
        assert!(report.finished_at >= started);
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("reports/session.json");
        let report = SessionReport::new(PathBuf::from("/watched"), Utc::now(), &state());

        report.write_to(&output).unwrap();

        let written: SessionReport =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, report);
    }
}
