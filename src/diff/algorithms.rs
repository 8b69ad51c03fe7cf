use std::collections::HashSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

use super::lines::split_lines;

/// Trait defining a text delta algorithm
pub trait DiffAlgorithm: Send + Sync {
    /// Compute the text added and deleted between old and new content
    fn diff(&self, old: &str, new: &str) -> TextDelta;

    /// Get the algorithm name
    fn name(&self) -> &'static str;

    /// Get algorithm description
    fn description(&self) -> &'static str;
}

/// Added and deleted text between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDelta {
    pub added_text: String,
    pub deleted_text: String,
}

impl TextDelta {
    pub fn is_empty(&self) -> bool {
        self.added_text.is_empty() && self.deleted_text.is_empty()
    }

    pub fn into_parts(self) -> (String, String) {
        (self.added_text, self.deleted_text)
    }
}

/// Line-set difference.
///
/// A line counts as added when its exact text (terminator included) appears
/// nowhere in the old content, and as deleted when it appears nowhere in the
/// new content. Position and multiplicity are ignored: a moved line shows up
/// on both sides, and removing one of two identical lines reports nothing.
pub struct LineSetAlgorithm;

impl DiffAlgorithm for LineSetAlgorithm {
    fn diff(&self, old: &str, new: &str) -> TextDelta {
        let old_lines = split_lines(old);
        let new_lines = split_lines(new);

        let old_set: HashSet<&str> = old_lines.iter().copied().collect();
        let new_set: HashSet<&str> = new_lines.iter().copied().collect();

        let added_text = new_lines
            .iter()
            .filter(|line| !old_set.contains(*line))
            .copied()
            .collect();
        let deleted_text = old_lines
            .iter()
            .filter(|line| !new_set.contains(*line))
            .copied()
            .collect();

        TextDelta {
            added_text,
            deleted_text,
        }
    }

    fn name(&self) -> &'static str {
        "Line set"
    }

    fn description(&self) -> &'static str {
        "Set difference of lines - cheap, ignores ordering and duplicates"
    }
}

/// Myers diff algorithm implementation
pub struct MyersAlgorithm;

impl DiffAlgorithm for MyersAlgorithm {
    fn diff(&self, old: &str, new: &str) -> TextDelta {
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(old, new);

        self.collect_delta(&diff)
    }

    fn name(&self) -> &'static str {
        "Myers"
    }

    fn description(&self) -> &'static str {
        "Myers' O(ND) diff algorithm - positional, handles moved and repeated lines"
    }
}

/// Patience diff algorithm implementation
pub struct PatienceAlgorithm;

impl DiffAlgorithm for PatienceAlgorithm {
    fn diff(&self, old: &str, new: &str) -> TextDelta {
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Patience)
            .diff_lines(old, new);

        self.collect_delta(&diff)
    }

    fn name(&self) -> &'static str {
        "Patience"
    }

    fn description(&self) -> &'static str {
        "Patience diff - better for refactored text with moved blocks"
    }
}

// Shared conversion from similar::TextDiff to a TextDelta
trait DeltaCollector {
    fn collect_delta<'a>(&self, diff: &TextDiff<'a, 'a, '_, str>) -> TextDelta {
        let mut delta = TextDelta::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => delta.added_text.push_str(change.value()),
                ChangeTag::Delete => delta.deleted_text.push_str(change.value()),
                ChangeTag::Equal => {}
            }
        }

        delta
    }
}

impl DeltaCollector for MyersAlgorithm {}
impl DeltaCollector for PatienceAlgorithm {}

/// Available diff algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffAlgorithmType {
    #[default]
    LineSet,
    Myers,
    Patience,
}

impl DiffAlgorithmType {
    pub fn all() -> &'static [DiffAlgorithmType] {
        &[Self::LineSet, Self::Myers, Self::Patience]
    }

    pub fn create(&self) -> Box<dyn DiffAlgorithm> {
        match self {
            Self::LineSet => Box::new(LineSetAlgorithm),
            Self::Myers => Box::new(MyersAlgorithm),
            Self::Patience => Box::new(PatienceAlgorithm),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LineSet => "line-set",
            Self::Myers => "myers",
            Self::Patience => "patience",
        }
    }
}

impl std::fmt::Display for DiffAlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DiffAlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown diff algorithm: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_set(old: &str, new: &str) -> (String, String) {
        LineSetAlgorithm.diff(old, new).into_parts()
    }

    #[test]
    fn test_line_set_pure_addition() {
        assert_eq!(line_set("", "a\nb\n"), ("a\nb\n".to_string(), String::new()));
    }

    #[test]
    fn test_line_set_pure_deletion() {
        assert_eq!(line_set("a\nb\n", ""), (String::new(), "a\nb\n".to_string()));
    }

    #[test]
    fn test_line_set_ignores_reordering() {
        assert_eq!(line_set("a\nb\n", "b\na\n"), (String::new(), String::new()));
    }

    #[test]
    fn test_line_set_collapses_duplicates() {
        // Dropping one of two identical lines is invisible to a set difference.
        assert_eq!(line_set("a\na\n", "a\n"), (String::new(), String::new()));
    }

    #[test]
    fn test_line_set_terminator_is_part_of_line() {
        // "b" without a newline is a different line from "b\n".
        let (added, deleted) = line_set("a\nb", "a\nb\nc\n");
        assert_eq!(added, "b\nc\n");
        assert_eq!(deleted, "b");
    }

    #[test]
    fn test_line_set_keeps_relative_order() {
        let (added, deleted) = line_set("one\ntwo\nthree\n", "zero\ntwo\nfour\nfive\n");
        assert_eq!(added, "zero\nfour\nfive\n");
        assert_eq!(deleted, "one\nthree\n");
    }

    #[test]
    fn test_line_set_moved_line_with_changed_terminator() {
        let (added, deleted) = line_set("x\ny", "y\nx");
        assert_eq!(added, "y\nx");
        assert_eq!(deleted, "x\ny");
    }

    #[test]
    fn test_myers_counts_duplicates() {
        let delta = MyersAlgorithm.diff("a\na\n", "a\n");
        assert_eq!(delta.added_text, "");
        assert_eq!(delta.deleted_text, "a\n");
    }

    #[test]
    fn test_patience_modification() {
        let delta = PatienceAlgorithm.diff("line1\nline2\nline3\n", "line1\nmodified\nline3\n");
        assert_eq!(delta.added_text, "modified\n");
        assert_eq!(delta.deleted_text, "line2\n");
    }

    #[test]
    fn test_algorithm_type_parsing() {
        assert_eq!("myers".parse::<DiffAlgorithmType>(), Ok(DiffAlgorithmType::Myers));
        assert_eq!("Line-Set".parse::<DiffAlgorithmType>(), Ok(DiffAlgorithmType::LineSet));
        assert!("lcs".parse::<DiffAlgorithmType>().is_err());
        assert_eq!(DiffAlgorithmType::default(), DiffAlgorithmType::LineSet);
    }
}
