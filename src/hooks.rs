//! Observation and control points of a running search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::phrase::Phrase;

/// Callbacks a search reports to. Every method has a default, so an
/// implementation only overrides what it cares about.
///
/// The same hooks object is shared by all workers of a parallel search,
/// so methods take `&self`; use atomics or a lock for any state.
pub trait SearchHooks {
    /// Polled before every candidate is tried. Returning true unwinds the
    /// whole search.
    fn is_cancelled(&self) -> bool {
        false
    }

    /// A worker is starting on a new first phrase.
    fn first_phrase_changed(&self, _phrase: &Phrase) {}

    /// A worker has finished one top-level candidate.
    fn progress(&self) {}

    /// A sentence using every letter of the pool was built.
    fn sentence_found(&self, sentence: &str) {
        println!("{}", sentence);
    }

    /// The worker with this offset has run out of candidates or was cancelled.
    fn worker_finished(&self, _offset: usize) {}
}

/// Prints each sentence on its own line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintSentences;

impl SearchHooks for PrintSentences {}

/// Shared cancellation switch.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl SearchHooks for CancelFlag {
    fn is_cancelled(&self) -> bool {
        CancelFlag::is_cancelled(self)
    }
}

/// Stores sentences instead of printing them, optionally cancelling the
/// search once `limit` have been found.
#[derive(Debug, Default)]
pub struct CollectSentences {
    sentences: Mutex<Vec<String>>,
    limit: Option<usize>,
    cancel: CancelFlag,
}

impl CollectSentences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Cancels the search when `flag` is set, e.g. from another thread.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_sentences(self) -> Vec<String> {
        self.sentences
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.sentences.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SearchHooks for CollectSentences {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn sentence_found(&self, sentence: &str) {
        let mut sentences = self.lock();
        if self.limit.map_or(false, |limit| sentences.len() >= limit) {
            return;
        }
        sentences.push(sentence.to_string());
        if self.limit == Some(sentences.len()) {
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!SearchHooks::is_cancelled(&flag));
        other.cancel();
        assert!(SearchHooks::is_cancelled(&flag));
    }

    #[test]
    fn test_collect_with_limit() {
        let hooks = CollectSentences::with_limit(2);
        hooks.sentence_found("a b");
        assert!(!hooks.is_cancelled());
        hooks.sentence_found("b a");
        assert!(hooks.is_cancelled());
        hooks.sentence_found("ab");
        assert_eq!(hooks.into_sentences(), vec!["a b", "b a"]);
    }

    #[test]
    fn test_collect_with_external_flag() {
        let flag = CancelFlag::new();
        let hooks = CollectSentences::new().with_cancel_flag(flag.clone());
        assert!(!hooks.is_cancelled());
        flag.cancel();
        assert!(hooks.is_cancelled());
        assert!(hooks.cancel_flag().is_cancelled());
    }
}
