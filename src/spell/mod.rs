//! Spelling findings for newly added text
//!
//! The flagger only tokenises and formats; deciding which words are unknown is
//! delegated to a `SpellService`. A word-list dictionary and an LRU-caching
//! wrapper are provided.

pub mod cache;
pub mod dictionary;

use std::collections::HashSet;
use std::sync::Arc;

pub use cache::CachedSpellService;
pub use dictionary::WordListDictionary;

use crate::config::SpellingConfig;

/// Anything that can tell which words it does not know.
pub trait SpellService: Send + Sync {
    /// Subset of `words` not found in the dictionary.
    ///
    /// Implementations may normalise the returned words (e.g. lowercase them).
    fn unknown_words(&self, words: &HashSet<String>) -> HashSet<String>;
}

impl<S: SpellService + ?Sized> SpellService for Arc<S> {
    fn unknown_words(&self, words: &HashSet<String>) -> HashSet<String> {
        (**self).unknown_words(words)
    }
}

impl<S: SpellService + ?Sized> SpellService for Box<S> {
    fn unknown_words(&self, words: &HashSet<String>) -> HashSet<String> {
        (**self).unknown_words(words)
    }
}

/// Knows every word. Used when spell checking is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpellService;

impl SpellService for NoopSpellService {
    fn unknown_words(&self, _words: &HashSet<String>) -> HashSet<String> {
        HashSet::new()
    }
}

/// Turns added text into `Misspelled word: <word>` findings.
#[derive(Clone)]
pub struct SpellFlagger {
    service: Arc<dyn SpellService>,
    notice: Option<String>,
}

impl SpellFlagger {
    pub fn new(service: Arc<dyn SpellService>) -> Self {
        Self {
            service,
            notice: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopSpellService))
    }

    /// Builds the flagger described by `config`.
    ///
    /// A dictionary that cannot be loaded disables spell checking with a
    /// warning rather than failing.
    pub fn from_config(config: &SpellingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        let path = config.dictionary_path();
        match WordListDictionary::load(&path) {
            Ok(dictionary) => {
                tracing::info!(
                    "Loaded {} dictionary words from {}",
                    dictionary.len(),
                    path.display()
                );
                Self::new(Arc::new(CachedSpellService::new(dictionary, config.cache_size)))
            }
            Err(err) => {
                let notice = format!("Spell checking disabled: {}", err);
                tracing::warn!("{}", notice);
                Self {
                    notice: Some(notice),
                    ..Self::disabled()
                }
            }
        }
    }

    /// Why spell checking was turned off, when it was not by request.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// One finding per unique unknown whitespace-separated token.
    ///
    /// Punctuation stays attached to the token. Findings are sorted.
    pub fn flag(&self, added_text: &str) -> Vec<String> {
        let words: HashSet<String> = added_text.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Vec::new();
        }

        let mut unknown: Vec<String> = self.service.unknown_words(&words).into_iter().collect();
        unknown.sort();

        unknown
            .into_iter()
            .map(|word| format!("Misspelled word: {}", word))
            .collect()
    }
}

impl std::fmt::Debug for SpellFlagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellFlagger")
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        calls: AtomicUsize,
    }

    impl SpellService for CountingService {
        fn unknown_words(&self, words: &HashSet<String>) -> HashSet<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            words.clone()
        }
    }

    fn flagger() -> SpellFlagger {
        let dictionary = WordListDictionary::from_words(["hello", "world", "the"]);
        SpellFlagger::new(Arc::new(dictionary))
    }

    #[test]
    fn test_flags_unknown_tokens() {
        let findings = flagger().flag("helo wrold");
        assert_eq!(
            findings,
            vec!["Misspelled word: helo", "Misspelled word: wrold"]
        );
    }

    #[test]
    fn test_empty_input_skips_service() {
        let service = Arc::new(CountingService {
            calls: AtomicUsize::new(0),
        });
        let flagger = SpellFlagger::new(service.clone());

        assert!(flagger.flag("").is_empty());
        assert!(flagger.flag(" \n\t").is_empty());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_duplicate_tokens_reported_once() {
        let findings = flagger().flag("helo helo\nhelo");
        assert_eq!(findings, vec!["Misspelled word: helo"]);
    }

    #[test]
    fn test_punctuation_is_kept() {
        let findings = flagger().flag("hello world.");
        assert_eq!(findings, vec!["Misspelled word: world."]);
    }

    #[test]
    fn test_disabled_flagger() {
        assert!(SpellFlagger::disabled().flag("zzqx wrold").is_empty());
    }

    #[test]
    fn test_from_config_missing_dictionary_disables() {
        let config = SpellingConfig {
            enabled: true,
            dictionary_path: Some("/definitely/not/here/words".into()),
            cache_size: 16,
        };
        let flagger = SpellFlagger::from_config(&config);
        assert!(flagger.flag("zzqx").is_empty());
        assert!(flagger
            .notice()
            .is_some_and(|notice| notice.starts_with("Spell checking disabled")));
    }

    #[test]
    fn test_disabled_by_request_has_no_notice() {
        let config = SpellingConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(SpellFlagger::from_config(&config).notice().is_none());
    }
}
