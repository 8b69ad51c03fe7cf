use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::SpellService;
use crate::error::{TrackerError, TrackerResult};

/// Longer tokens than the longest known word plus this slack are not checked.
const LENGTH_SLACK: usize = 3;

const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Case-insensitive dictionary backed by a plain word list.
#[derive(Debug, Clone, Default)]
pub struct WordListDictionary {
    words: HashSet<String>,
    longest_word: usize,
}

impl WordListDictionary {
    /// Loads a newline-separated word list. Blank lines and `#` comments are
    /// skipped; invalid UTF-8 is replaced.
    pub fn load<P: AsRef<Path>>(path: P) -> TrackerResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TrackerError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;

        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::default();
        for word in words {
            dictionary.insert(word.as_ref());
        }
        dictionary
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.to_lowercase();
        self.longest_word = self.longest_word.max(word.chars().count());
        self.words.insert(word);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    // Lone punctuation, numbers and implausibly long tokens are never flagged.
    fn should_check(&self, word: &str) -> bool {
        let mut chars = word.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if PUNCTUATION.contains(ch) {
                return false;
            }
        }

        if word.chars().count() > self.longest_word + LENGTH_SLACK {
            return false;
        }

        word.parse::<f64>().is_err()
    }
}

impl SpellService for WordListDictionary {
    fn unknown_words(&self, words: &HashSet<String>) -> HashSet<String> {
        words
            .iter()
            .map(|word| word.to_lowercase())
            .filter(|word| !self.words.contains(word) && self.should_check(word))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn words(list: &[&str]) -> HashSet<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let dictionary = WordListDictionary::from_words(["Hello", "world"]);
        assert!(dictionary.contains("HELLO"));
        assert!(dictionary.contains("World"));
        assert!(!dictionary.contains("wrold"));
    }

    #[test]
    fn test_unknown_words_are_lowercased() {
        let dictionary = WordListDictionary::from_words(["hello"]);
        let unknown = dictionary.unknown_words(&words(&["Hello", "Helo"]));
        assert_eq!(unknown, words(&["helo"]));
    }

    #[test]
    fn test_numbers_and_punctuation_ignored() {
        let dictionary = WordListDictionary::from_words(["word"]);
        let unknown = dictionary.unknown_words(&words(&["42", "3.14", "-", "?", "zz"]));
        assert_eq!(unknown, words(&["zz"]));
    }

    #[test]
    fn test_overlong_tokens_ignored() {
        let dictionary = WordListDictionary::from_words(["cat"]);
        let unknown = dictionary.unknown_words(&words(&["abcdef", "abcdefg"]));
        assert_eq!(unknown, words(&["abcdef"]));
    }

    #[test]
    fn test_load_word_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment\nalpha\n\n  Beta  \ngamma").unwrap();

        let dictionary = WordListDictionary::load(file.path()).unwrap();
        assert_eq!(dictionary.len(), 3);
        assert!(dictionary.contains("beta"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = WordListDictionary::load("/no/such/dictionary").unwrap_err();
        assert!(matches!(err, TrackerError::Dictionary { .. }));
    }
}
