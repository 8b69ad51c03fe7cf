use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};

use crate::config::TrackerConfig;
use crate::diff::DiffAlgorithmType;
use crate::error::{TrackerError, TrackerResult};

#[derive(Parser, Debug)]
#[command(name = "texttracker")]
#[command(version)]
#[command(about = "Tracks how much text is added and deleted under a directory, flagging likely misspellings")]
#[command(long_about = "texttracker watches a directory tree, diffs every modified file against its last snapshot, keeps running totals of added and deleted characters and reports unknown words in newly added text.")]
pub struct Cli {
    /// Directory to watch for changes
    #[arg(value_name = "PATH", help = "Path to watch (defaults to current directory)")]
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "tui", help = "Output format")]
    pub output: OutputFormat,

    /// Diff algorithm used to compute added and deleted text
    #[arg(long, help = "Diff algorithm (default: line-set)")]
    pub algorithm: Option<DiffAlgorithmType>,

    /// Word list for spell checking
    #[arg(long, value_name = "FILE", help = "Dictionary word list, one word per line")]
    pub dictionary: Option<PathBuf>,

    #[arg(long, help = "Disable spell checking of added text")]
    pub no_spellcheck: bool,

    #[arg(long, help = "Skip files ignored by the root .gitignore")]
    pub gitignore: bool,

    /// Ignore additional patterns
    #[arg(long, value_delimiter = ',', help = "Additional gitignore-style patterns to skip")]
    pub ignore: Option<Vec<String>>,

    #[arg(long, value_name = "FILE", help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Write a JSON session report on exit")]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_name = "FILE", help = "Write logs to a file")]
    pub log_file: Option<PathBuf>,

    /// Disable colors in output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal user interface (default)
    Tui,
    /// Plain text output
    Text,
    /// JSON lines for scripting
    Json,
}

impl Cli {
    pub fn get_watch_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }

    /// File and environment configuration with command line overrides applied
    pub fn load_config(&self) -> TrackerResult<TrackerConfig> {
        let mut config = TrackerConfig::load_or_default(self.config.as_deref())?;

        if let Some(algorithm) = self.algorithm {
            config.diff.algorithm = algorithm;
        }
        if let Some(ref dictionary) = self.dictionary {
            config.spelling.dictionary_path = Some(dictionary.clone());
        }
        if self.no_spellcheck {
            config.spelling.enabled = false;
        }
        if self.gitignore {
            config.watcher.respect_gitignore = true;
        }
        if let Some(ref patterns) = self.ignore {
            config.watcher.ignore_patterns.extend(patterns.iter().cloned());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        let builder = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false);

        if let Some(ref log_file) = self.log_file {
            match File::create(log_file) {
                Ok(file) => {
                    builder.with_ansi(false).with_writer(Mutex::new(file)).init();
                    return;
                }
                Err(err) => eprintln!("Cannot open log file {}: {}", log_file.display(), err),
            }
        }

        // Log lines would corrupt the terminal UI.
        if self.output == OutputFormat::Tui {
            builder.with_writer(std::io::sink).init();
        } else {
            builder.with_writer(std::io::stderr).init();
        }
    }

    pub fn validate(&self) -> TrackerResult<()> {
        let path = self.get_watch_path();

        if !path.is_dir() {
            return Err(TrackerError::invalid_root(&path));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "texttracker",
            "/tmp",
            "--output",
            "json",
            "--algorithm",
            "myers",
            "--ignore",
            "*.log,target/",
            "--no-spellcheck",
        ])
        .unwrap();

        assert_eq!(cli.path, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.algorithm, Some(DiffAlgorithmType::Myers));
        assert_eq!(cli.ignore, Some(vec!["*.log".to_string(), "target/".to_string()]));
        assert!(cli.no_spellcheck);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "texttracker",
            "--algorithm",
            "patience",
            "--gitignore",
            "--dictionary",
            "/tmp/words",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.diff.algorithm, DiffAlgorithmType::Patience);
        assert!(config.watcher.respect_gitignore);
        assert_eq!(config.spelling.dictionary_path(), PathBuf::from("/tmp/words"));
    }

    #[test]
    fn test_validate_path() {
        let dir = TempDir::new().unwrap();
        let ok = Cli::try_parse_from(["texttracker", dir.path().to_str().unwrap()]).unwrap();
        assert!(ok.validate().is_ok());

        let missing = Cli::try_parse_from(["texttracker", "/no/such/dir"]).unwrap();
        let err = missing.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid directory path"));
    }
}
