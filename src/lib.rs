//! Multi-word anagram search.
//!
//! A [`LetterPool`] holds the letters of a subject phrase. A [`PhraseList`]
//! is loaded against it, keeping only phrases the pool can spell, and a
//! [`SentenceBuilder`] enumerates every ordered sequence of phrases that
//! uses up the pool exactly. Results, progress and cancellation flow
//! through [`SearchHooks`]; [`Rule`]s veto candidates as the sentence grows.
//!
//! ```
//! use anagram_search::{CollectSentences, LetterPool, PhraseList, SentenceBuilder};
//!
//! let pool = LetterPool::from_letters("ab");
//! let phrases = PhraseList::from_phrases(["a", "b", "ab"], &pool);
//! let hooks = CollectSentences::new();
//! SentenceBuilder::new(&phrases).run(&pool, &hooks);
//! assert_eq!(hooks.into_sentences(), vec!["a b", "b a", "ab"]);
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod phrase;
pub mod pool;
pub mod rules;
pub mod sentence;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use hooks::{CancelFlag, CollectSentences, PrintSentences, SearchHooks};
pub use phrase::{extract_words, narrow, AcceptAll, LetterCount, Phrase, PhraseFilter, PhraseList};
pub use pool::LetterPool;
pub use rules::{EndsWithLetter, NoRepeatedWords, Rule, UniqueWordLengths};
pub use sentence::{SearchStats, SentenceBuilder};
