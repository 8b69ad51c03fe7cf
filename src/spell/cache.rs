use std::collections::HashSet;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::SpellService;

/// Remembers per-word verdicts of an inner service.
///
/// Each cached entry holds the word as the inner service reported it when
/// unknown, or `None` when known.
pub struct CachedSpellService<S> {
    inner: S,
    verdicts: Mutex<LruCache<String, Option<String>>>,
}

impl<S: SpellService> CachedSpellService<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            verdicts: Mutex::new(LruCache::new(capacity)),
        }
    }

}

impl<S: SpellService> SpellService for CachedSpellService<S> {
    fn unknown_words(&self, words: &HashSet<String>) -> HashSet<String> {
        let mut unknown = HashSet::new();
        let mut misses = Vec::new();

        {
            let mut verdicts = self.verdicts.lock();
            for word in words {
                match verdicts.get(word) {
                    Some(Some(reported)) => {
                        unknown.insert(reported.clone());
                    }
                    Some(None) => {}
                    None => misses.push(word),
                }
            }
        }

        // Queried one word at a time so each verdict maps back to its input.
        for word in misses {
            let single = HashSet::from([word.clone()]);
            let reported = self.inner.unknown_words(&single).into_iter().next();
            if let Some(ref reported) = reported {
                unknown.insert(reported.clone());
            }
            self.verdicts.lock().put(word.clone(), reported);
        }

        unknown
    }
}
