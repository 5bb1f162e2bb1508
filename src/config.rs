use std::num::NonZeroUsize;

/// Settings shared by every worker of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Upper bound on words per sentence; `None` is unlimited.
    pub max_words: Option<usize>,
    /// Number of workers the top-level candidates are striped across.
    pub threads: NonZeroUsize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_words: None,
            threads: NonZeroUsize::MIN,
        }
    }
}

impl SearchConfig {
    pub fn with_threads(mut self, threads: NonZeroUsize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_max_words(mut self, max_words: Option<usize>) -> Self {
        self.max_words = max_words;
        self
    }

    /// Sets the word budget from a plain count, where `0` means no limit.
    pub fn with_word_limit(self, limit: usize) -> Self {
        self.with_max_words((limit > 0).then_some(limit))
    }
}
