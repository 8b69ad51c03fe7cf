use super::algorithms::{DiffAlgorithm, DiffAlgorithmType, TextDelta};

/// Computes text deltas between snapshots with a configurable algorithm
pub struct DiffEngine {
    algorithm: Box<dyn DiffAlgorithm>,
}

impl DiffEngine {
    /// Create a new engine with the specified algorithm
    pub fn new(algorithm_type: DiffAlgorithmType) -> Self {
        Self {
            algorithm: algorithm_type.create(),
        }
    }

    /// Create an engine with a custom algorithm
    pub fn with_algorithm(algorithm: Box<dyn DiffAlgorithm>) -> Self {
        Self { algorithm }
    }

    /// Text added and deleted going from `old` to `new`
    pub fn diff(&self, old: &str, new: &str) -> TextDelta {
        self.algorithm.diff(old, new)
    }

    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }

    pub fn algorithm_description(&self) -> &str {
        self.algorithm.description()
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DiffAlgorithmType::default())
    }
}

impl std::fmt::Debug for DiffEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffEngine")
            .field("algorithm", &self.algorithm.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_is_line_set() {
        let engine = DiffEngine::default();
        assert_eq!(engine.algorithm_name(), "Line set");

        let delta = engine.diff("hello\n", "hello\nworld\n");
        assert_eq!(delta.added_text, "world\n");
        assert_eq!(delta.deleted_text, "");
    }

    #[test]
    fn test_engine_with_myers() {
        let engine = DiffEngine::new(DiffAlgorithmType::Myers);
        let delta = engine.diff("a\nb\n", "b\na\n");

        assert_eq!(engine.algorithm_name(), "Myers");
        assert!(!delta.is_empty());
    }

    #[test]
    fn test_custom_algorithm() {
        struct Everything;

        impl DiffAlgorithm for Everything {
            fn diff(&self, old: &str, new: &str) -> TextDelta {
                TextDelta {
                    added_text: new.to_string(),
                    deleted_text: old.to_string(),
                }
            }

            fn name(&self) -> &'static str {
                "Everything"
            }

            fn description(&self) -> &'static str {
                "Reports whole files"
            }
        }

        let engine = DiffEngine::with_algorithm(Box::new(Everything));
        let delta = engine.diff("x", "y");
        assert_eq!(delta.into_parts(), ("y".to_string(), "x".to_string()));
    }
}
