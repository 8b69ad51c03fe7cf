use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::config::WatcherConfig;
use crate::error::{TrackerError, TrackerResult};

/// Decides which paths under the watch root are tracked.
///
/// With no gitignore handling and no extra patterns every path is tracked.
#[derive(Debug, Clone)]
pub struct FileFilter {
    root_path: PathBuf,
    respect_gitignore: bool,
    matcher: Option<Gitignore>,
}

impl FileFilter {
    /// Tracks everything under `root_path`.
    pub fn allow_all<P: AsRef<Path>>(root_path: P) -> Self {
        Self {
            root_path: root_path.as_ref().to_path_buf(),
            respect_gitignore: false,
            matcher: None,
        }
    }

    pub fn new<P: AsRef<Path>>(root_path: P, config: &WatcherConfig) -> TrackerResult<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        if !config.respect_gitignore && config.ignore_patterns.is_empty() {
            return Ok(Self::allow_all(root_path));
        }

        let mut builder = GitignoreBuilder::new(&root_path);
        if config.respect_gitignore {
            let gitignore = root_path.join(".gitignore");
            if gitignore.is_file() {
                if let Some(err) = builder.add(&gitignore) {
                    tracing::warn!("Error reading {}: {}", gitignore.display(), err);
                }
            }
        }

        for pattern in &config.ignore_patterns {
            builder.add_line(None, pattern).map_err(|err| {
                TrackerError::Configuration(format!("invalid ignore pattern '{}': {}", pattern, err))
            })?;
        }

        let matcher = builder
            .build()
            .map_err(|err| TrackerError::Configuration(format!("invalid ignore patterns: {}", err)))?;

        Ok(Self {
            root_path,
            respect_gitignore: config.respect_gitignore,
            matcher: Some(matcher),
        })
    }

    pub fn should_track<P: AsRef<Path>>(&self, path: P, is_dir: bool) -> bool {
        let path = path.as_ref();

        // The matcher only understands paths below its root.
        let Ok(relative) = path.strip_prefix(&self.root_path) else {
            return true;
        };

        if self.respect_gitignore && relative.components().any(|comp| comp.as_os_str() == ".git") {
            return false;
        }

        match &self.matcher {
            Some(matcher) => !matcher
                .matched_path_or_any_parents(relative, is_dir)
                .is_ignore(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_allow_all() {
        let filter = FileFilter::allow_all("/watched");
        assert!(filter.should_track("/watched/.git/HEAD", false));
        assert!(filter.should_track("/watched/target/out.txt", false));
        assert!(filter.should_track("/elsewhere/file.txt", false));
    }

    #[test]
    fn test_extra_patterns() {
        let config = WatcherConfig {
            ignore_patterns: vec!["*.log".to_string(), "build/".to_string()],
            ..Default::default()
        };
        let filter = FileFilter::new("/watched", &config).unwrap();

        assert!(!filter.should_track("/watched/debug.log", false));
        assert!(!filter.should_track("/watched/build/notes.txt", false));
        assert!(filter.should_track("/watched/notes.txt", false));
    }

    #[test]
    fn test_respects_gitignore() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "secret.txt\n").unwrap();

        let config = WatcherConfig {
            respect_gitignore: true,
            ..Default::default()
        };
        let filter = FileFilter::new(dir.path(), &config).unwrap();

        assert!(!filter.should_track(dir.path().join("secret.txt"), false));
        assert!(!filter.should_track(dir.path().join(".git/index"), false));
        assert!(filter.should_track(dir.path().join("draft.txt"), false));
    }
}
