//! Backtracking search for sentences that use up a letter pool.
//!
//! At every depth the inherited candidates are narrowed to those still
//! spellable from the pool. Each survivor is placed (its letters taken from
//! the pool, its text appended to the sentence), the search recurses, and
//! the placement is undone when its guard drops. Undoing on drop means the
//! pool and sentence are restored on every exit path, cancellation included.
//!
//! Parallel searches stripe the top-level candidates across workers: the
//! worker with offset `i` of `n` takes candidates `i`, `i + n`, `i + 2n`, ...
//! Each worker owns a copy of the pool; the phrase list is shared read-only.

use std::num::NonZeroUsize;
use std::ops::{AddAssign, ControlFlow};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::hooks::SearchHooks;
use crate::phrase::{narrow, Phrase, PhraseList};
use crate::pool::LetterPool;
use crate::rules::Rule;

/// Counters reported by a finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Complete sentences delivered to the hooks.
    pub sentences: u64,
    /// Phrases placed into a sentence, across all depths.
    pub placements: u64,
    /// Whether the search stopped early on cancellation.
    pub cancelled: bool,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.sentences += other.sentences;
        self.placements += other.placements;
        self.cancelled |= other.cancelled;
    }
}

/// Enumerates every ordering of phrases from a [`PhraseList`] that spells
/// a pool exactly.
pub struct SentenceBuilder<'a> {
    phrases: &'a PhraseList,
    max_words: Option<usize>,
    rules: Vec<Box<dyn Rule + 'a>>,
}

impl<'a> SentenceBuilder<'a> {
    pub fn new(phrases: &'a PhraseList) -> Self {
        Self {
            phrases,
            max_words: None,
            rules: Vec::new(),
        }
    }

    /// Limits sentences to at most `max_words` words; `None` lifts the limit.
    pub fn max_words(mut self, max_words: Option<usize>) -> Self {
        self.max_words = max_words;
        self
    }

    /// Adds an acceptance rule. Rules are checked in the order added and a
    /// candidate must pass all of them.
    pub fn rule<R: Rule + 'a>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Searches on the calling thread.
    ///
    /// `pool` is copied; the caller's pool is never modified.
    pub fn run<H: SearchHooks + ?Sized>(&self, pool: &LetterPool, hooks: &H) -> SearchStats {
        let stats = self.run_worker(pool, 0, NonZeroUsize::MIN, hooks);
        info!(
            sentences = stats.sentences,
            placements = stats.placements,
            cancelled = stats.cancelled,
            "search finished"
        );
        stats
    }

    /// Searches with `threads` workers striped over the top-level candidates.
    ///
    /// Blocks until every worker has finished. One thread runs inline.
    pub fn run_parallel<H>(
        &self,
        pool: &LetterPool,
        threads: NonZeroUsize,
        hooks: &H,
    ) -> Result<SearchStats>
    where
        H: SearchHooks + Sync + ?Sized,
    {
        if threads.get() == 1 {
            return Ok(self.run(pool, hooks));
        }

        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|i| format!("anagram-worker-{}", i))
            .build()?;

        let stats = workers.install(|| {
            (0..threads.get())
                .into_par_iter()
                .map(|offset| self.run_worker(pool, offset, threads, hooks))
                .reduce(SearchStats::default, |mut total, stats| {
                    total += stats;
                    total
                })
        });
        info!(
            threads = threads.get(),
            sentences = stats.sentences,
            placements = stats.placements,
            cancelled = stats.cancelled,
            "parallel search finished"
        );
        Ok(stats)
    }

    /// Applies `config` and runs with its thread count.
    pub fn run_with_config<H>(
        self,
        pool: &LetterPool,
        config: &SearchConfig,
        hooks: &H,
    ) -> Result<SearchStats>
    where
        H: SearchHooks + Sync + ?Sized,
    {
        self.max_words(config.max_words)
            .run_parallel(pool, config.threads, hooks)
    }

    fn run_worker<H: SearchHooks + ?Sized>(
        &self,
        pool: &LetterPool,
        offset: usize,
        step: NonZeroUsize,
        hooks: &H,
    ) -> SearchStats {
        let mut worker = Worker {
            builder: self,
            hooks,
            offset,
            step: step.get(),
            stats: SearchStats::default(),
        };

        let mut pool = *pool;
        if !pool.is_empty() && !self.phrases.is_empty() {
            debug!(offset, step = step.get(), "worker starting");
            let capacity = 2 * pool.total_count() + self.phrases.extra_capacity();
            let mut sentence = String::new();
            if sentence.try_reserve(capacity).is_ok() {
                let candidates = self.phrases.candidates();
                let flow = worker.step(0, 0, &candidates, &mut pool, &mut sentence);
                worker.stats.cancelled = flow.is_break();
            } else {
                warn!(capacity, "could not allocate sentence buffer");
            }
        }

        hooks.worker_finished(offset);
        debug!(offset, sentences = worker.stats.sentences, "worker finished");
        worker.stats
    }
}

/// One worker's view of the search.
struct Worker<'b, 'a, H: ?Sized> {
    builder: &'b SentenceBuilder<'a>,
    hooks: &'b H,
    offset: usize,
    step: usize,
    stats: SearchStats,
}

impl<'b, 'a, H: SearchHooks + ?Sized> Worker<'b, 'a, H> {
    /// Tries every viable candidate at `depth`. Breaks on cancellation.
    fn step(
        &mut self,
        depth: usize,
        words: usize,
        inherited: &[&Phrase],
        pool: &mut LetterPool,
        sentence: &mut String,
    ) -> ControlFlow<()> {
        let candidates = match narrow(inherited, pool) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(depth, %err, "abandoning branch");
                return ControlFlow::Continue(());
            }
        };

        let (skip, stride) = if depth == 0 {
            (self.offset, self.step)
        } else {
            (0, 1)
        };

        for &phrase in candidates.iter().skip(skip).step_by(stride) {
            if self.hooks.is_cancelled() {
                return ControlFlow::Break(());
            }

            let flow = self.try_phrase(depth, words, phrase, &candidates, pool, sentence);

            if depth == 0 {
                self.hooks.progress();
            }
            if flow.is_break() {
                return flow;
            }
        }
        ControlFlow::Continue(())
    }

    fn try_phrase(
        &mut self,
        depth: usize,
        words: usize,
        phrase: &Phrase,
        candidates: &[&Phrase],
        pool: &mut LetterPool,
        sentence: &mut String,
    ) -> ControlFlow<()> {
        let words = words + phrase.word_count();
        if self.builder.max_words.map_or(false, |max| words > max) {
            return ControlFlow::Continue(());
        }
        if !self
            .builder
            .rules
            .iter()
            .all(|rule| rule.accepts(phrase, sentence, pool))
        {
            return ControlFlow::Continue(());
        }
        if depth == 0 {
            self.hooks.first_phrase_changed(phrase);
        }

        let Some(placed) = Placement::new(pool, sentence, phrase) else {
            warn!(depth, "could not grow sentence buffer, abandoning branch");
            return ControlFlow::Continue(());
        };
        self.stats.placements += 1;

        if placed.pool.is_empty() {
            self.stats.sentences += 1;
            self.hooks.sentence_found(placed.sentence.as_str());
            return ControlFlow::Continue(());
        }

        if self.builder.max_words.map_or(true, |max| words < max) {
            return self.step(depth + 1, words, candidates, placed.pool, placed.sentence);
        }
        ControlFlow::Continue(())
    }
}

/// A phrase taken from the pool and appended to the sentence. Dropping it
/// puts the letters back and truncates the sentence.
struct Placement<'s> {
    pool: &'s mut LetterPool,
    sentence: &'s mut String,
    phrase: &'s Phrase,
    mark: usize,
}

impl<'s> Placement<'s> {
    /// Returns `None`, with nothing changed, if the sentence can't grow.
    fn new(pool: &'s mut LetterPool, sentence: &'s mut String, phrase: &'s Phrase) -> Option<Self> {
        let mark = sentence.len();
        sentence.try_reserve(phrase.len() + 1).ok()?;
        debug_assert!(pool.can_spell(phrase.text()));

        if mark > 0 {
            sentence.push(' ');
        }
        sentence.push_str(phrase.text());
        pool.subtract(phrase.text());
        Some(Self {
            pool,
            sentence,
            phrase,
            mark,
        })
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.pool.add(self.phrase.text());
        self.sentence.truncate(self.mark);
    }
}
