//! Configuration management for texttracker
//!
//! Values come from built-in defaults, an optional TOML file, then
//! `TEXTTRACKER_*` environment variables, and finally command line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::diff::DiffAlgorithmType;
use crate::error::{TrackerError, TrackerResult};

/// Word list used when no dictionary is configured
pub const DEFAULT_DICTIONARY: &str = "/usr/share/dict/words";

/// Global configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// File watcher configuration
    pub watcher: WatcherConfig,
    /// Diff configuration
    pub diff: DiffConfig,
    /// Spell checking configuration
    pub spelling: SpellingConfig,
}

/// Configuration for file watching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Skip files matched by the root's .gitignore (and anything under .git)
    pub respect_gitignore: bool,
    /// Extra gitignore-style patterns to skip
    pub ignore_patterns: Vec<String>,
    /// How often the terminal UI polls for updates, in milliseconds
    pub update_poll_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    pub algorithm: DiffAlgorithmType,
}

/// Configuration for spell checking of added text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    pub enabled: bool,
    /// Word list, one word per line
    pub dictionary_path: Option<PathBuf>,
    /// Number of per-word verdicts to keep
    pub cache_size: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: false,
            ignore_patterns: Vec::new(),
            update_poll_ms: 50,
        }
    }
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dictionary_path: None,
            cache_size: 4096,
        }
    }
}

impl WatcherConfig {
    pub fn update_poll_duration(&self) -> Duration {
        Duration::from_millis(self.update_poll_ms)
    }
}

impl SpellingConfig {
    pub fn dictionary_path(&self) -> PathBuf {
        self.dictionary_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DICTIONARY))
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> TrackerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| TrackerError::ConfigFile(format!("{}: {}", path.display(), err)))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> TrackerResult<Self> {
        toml::from_str(text).map_err(|err| TrackerError::ConfigFile(err.to_string()))
    }

    /// Load from `path` when given, otherwise defaults; env overrides applied
    pub fn load_or_default(path: Option<&Path>) -> TrackerResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override with environment variables if present
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("TEXTTRACKER_ALGORITHM") {
            match val.parse::<DiffAlgorithmType>() {
                Ok(algorithm) => self.diff.algorithm = algorithm,
                Err(err) => tracing::warn!("Ignoring TEXTTRACKER_ALGORITHM: {}", err),
            }
        }

        if let Ok(val) = std::env::var("TEXTTRACKER_DICTIONARY") {
            if !val.is_empty() {
                self.spelling.dictionary_path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("TEXTTRACKER_SPELLING") {
            if let Some(enabled) = parse_flag(&val) {
                self.spelling.enabled = enabled;
            }
        }

        if let Ok(val) = std::env::var("TEXTTRACKER_RESPECT_GITIGNORE") {
            if let Some(respect) = parse_flag(&val) {
                self.watcher.respect_gitignore = respect;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> TrackerResult<()> {
        if self.spelling.cache_size == 0 {
            return Err(TrackerError::Configuration(
                "spelling.cache_size must be greater than 0".to_string(),
            ));
        }

        if self.watcher.update_poll_ms == 0 {
            return Err(TrackerError::Configuration(
                "watcher.update_poll_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
