//! Candidate phrases and the lists the search draws them from.
//!
//! A phrase is one or more words joined by spaces and/or punctuation. A
//! [`PhraseList`] only ever holds phrases that were spellable from the pool
//! it was loaded against; [`narrow`] cuts it down further as the pool shrinks.

use std::collections::HashSet;
use std::collections::TryReserveError;
use std::fmt;
use std::io::BufRead;

use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::pool::LetterPool;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phrase {
    text: String,
    letters: usize,
    words: usize,
}

impl Phrase {
    /// Wraps `text`, stopping at the first line terminator.
    pub fn new(text: &str) -> Self {
        let end = text.find(&['\n', '\r', '\0'][..]).unwrap_or(text.len());
        let text = text[..end].to_string();
        let letters = text.chars().filter(char::is_ascii_alphabetic).count();
        let words = text.split(' ').filter(|w| !w.is_empty()).count();
        Self {
            text,
            letters,
            words,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of alphabetic characters.
    pub fn letter_count(&self) -> usize {
        self.letters
    }

    /// Number of space-delimited words.
    pub fn word_count(&self) -> usize {
        self.words
    }

    pub fn first_word(&self) -> &str {
        let (start, len) = first_word(&self.text);
        &self.text[start..start + len]
    }

    pub fn last_word(&self) -> &str {
        let (start, len) = last_word(&self.text);
        &self.text[start..start + len]
    }

    /// Whether this phrase could ever appear in a sentence: it has at least
    /// one letter and nothing but letters, spaces and punctuation.
    pub fn is_well_formed(&self) -> bool {
        self.letters > 0
            && self
                .text
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == ' ' || c.is_ascii_punctuation())
    }

    /// Characters that take buffer space without consuming a letter.
    fn non_letters(&self) -> usize {
        self.text.len() - self.letters
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Byte offset and length of the first space-delimited word of `text`.
pub fn first_word(text: &str) -> (usize, usize) {
    let start = text.len() - text.trim_start_matches(' ').len();
    let len = text[start..].find(' ').unwrap_or(text.len() - start);
    (start, len)
}

/// Byte offset and length of the last space-delimited word of `text`.
pub fn last_word(text: &str) -> (usize, usize) {
    let end = text.trim_end_matches(' ').len();
    let start = text[..end].rfind(' ').map_or(0, |i| i + 1);
    (start, end - start)
}

/// Load-time acceptance test, applied to well-formed lines before the
/// spellability check.
pub trait PhraseFilter {
    fn accepts(&self, phrase: &Phrase, pool: &LetterPool) -> bool;
}

/// Keeps every well-formed phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PhraseFilter for AcceptAll {
    fn accepts(&self, _phrase: &Phrase, _pool: &LetterPool) -> bool {
        true
    }
}

/// Keeps only phrases with exactly this many letters.
#[derive(Debug, Clone, Copy)]
pub struct LetterCount(pub usize);

impl PhraseFilter for LetterCount {
    fn accepts(&self, phrase: &Phrase, _pool: &LetterPool) -> bool {
        phrase.letter_count() == self.0
    }
}

impl<F> PhraseFilter for F
where
    F: Fn(&Phrase, &LetterPool) -> bool,
{
    fn accepts(&self, phrase: &Phrase, pool: &LetterPool) -> bool {
        self(phrase, pool)
    }
}

/// An ordered set of candidate phrases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseList {
    phrases: Vec<Phrase>,
}

impl PhraseList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one phrase per line, keeping those spellable from `pool`.
    pub fn load<R: BufRead>(reader: R, pool: &LetterPool) -> Result<Self> {
        Self::load_filtered(reader, pool, &AcceptAll)
    }

    /// Like [`load`](Self::load), with an extra acceptance test.
    ///
    /// Malformed lines (bad UTF-8, stray characters, no letters) are skipped.
    /// A read error on the source is fatal.
    pub fn load_filtered<R, F>(reader: R, pool: &LetterPool, filter: &F) -> Result<Self>
    where
        R: BufRead,
        F: PhraseFilter + ?Sized,
    {
        let mut list = Self::new();
        let mut skipped = 0usize;
        for line in reader.split(b'\n') {
            let line = line?;
            let Ok(text) = std::str::from_utf8(&line) else {
                skipped += 1;
                continue;
            };
            if !list.push_filtered(Phrase::new(text), pool, filter) {
                skipped += 1;
            }
        }
        debug!(kept = list.len(), skipped, "loaded phrase list");
        Ok(list)
    }

    /// Builds a list from in-memory phrases with the same rules as `load`.
    pub fn from_phrases<'t, I>(phrases: I, pool: &LetterPool) -> Self
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut list = Self::new();
        for text in phrases {
            list.push_filtered(Phrase::new(text), pool, &AcceptAll);
        }
        list
    }

    fn push_filtered<F>(&mut self, phrase: Phrase, pool: &LetterPool, filter: &F) -> bool
    where
        F: PhraseFilter + ?Sized,
    {
        let keep = phrase.is_well_formed()
            && filter.accepts(&phrase, pool)
            && pool.can_spell(phrase.text());
        if keep {
            self.phrases.push(phrase);
        }
        keep
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phrase> {
        self.phrases.iter()
    }

    /// Borrowed view of every phrase, the starting candidate set of a search.
    pub fn candidates(&self) -> Vec<&Phrase> {
        self.phrases.iter().collect()
    }

    /// The phrases still spellable from `pool`, in the same order.
    pub fn narrow(&self, pool: &LetterPool) -> Self {
        Self {
            phrases: self
                .phrases
                .iter()
                .filter(|p| p.letter_count() > 0 && pool.can_spell(p.text()))
                .cloned()
                .collect(),
        }
    }

    /// Sorts, drops exact duplicates, then collapses case-insensitive
    /// duplicates in favour of the lexicographically later spelling.
    pub fn sort_and_dedup(self) -> Self {
        let unique = self.phrases.into_iter().sorted().dedup().collect_vec();

        let mut seen = HashSet::new();
        let mut phrases = unique
            .into_iter()
            .rev()
            .filter(|p| seen.insert(p.text().to_lowercase()))
            .collect_vec();
        phrases.reverse();
        Self { phrases }
    }

    /// Non-letter characters across all phrases; spaces in the sentence
    /// buffer are budgeted separately.
    pub fn extra_capacity(&self) -> usize {
        self.phrases.iter().map(Phrase::non_letters).sum()
    }
}

/// Collects well-formed phrases; the rest are dropped. No pool is involved,
/// so spellability is left to [`narrow`].
impl FromIterator<Phrase> for PhraseList {
    fn from_iter<T: IntoIterator<Item = Phrase>>(iter: T) -> Self {
        Self {
            phrases: iter.into_iter().filter(Phrase::is_well_formed).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PhraseList {
    type Item = &'a Phrase;
    type IntoIter = std::slice::Iter<'a, Phrase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phrases.iter()
    }
}

/// Candidates still spellable from `pool`, preserving order. Phrases
/// without letters never survive, since placing one would not shrink the pool.
///
/// Fails only if the new list can't be allocated.
pub fn narrow<'a>(
    candidates: &[&'a Phrase],
    pool: &LetterPool,
) -> std::result::Result<Vec<&'a Phrase>, TryReserveError> {
    let mut narrowed = Vec::new();
    narrowed.try_reserve(candidates.len())?;
    narrowed.extend(
        candidates
            .iter()
            .copied()
            .filter(|p| p.letter_count() > 0 && pool.can_spell(p.text())),
    );
    Ok(narrowed)
}

/// Lists the words of a free-text document, in order of appearance.
///
/// Words are split on whitespace and on runs of punctuation; leading and
/// trailing non-letters are trimmed, and words containing digits dropped.
pub fn extract_words<R: BufRead>(reader: R) -> Result<PhraseList> {
    let mut words = PhraseList::new();
    for line in reader.split(b'\n') {
        let line = String::from_utf8_lossy(&line?).into_owned();
        for token in line.split_ascii_whitespace() {
            for piece in split_punctuation_runs(token) {
                let word = piece.trim_start_matches(|c: char| !c.is_ascii_alphabetic());
                if word.chars().any(|c| c.is_ascii_digit()) {
                    continue;
                }
                let word = word.trim_end_matches(|c: char| !c.is_ascii_alphabetic());
                if !word.is_empty() {
                    words.phrases.push(Phrase::new(word));
                }
            }
        }
    }
    debug!(words = words.len(), "extracted words");
    Ok(words)
}

/// Splits `token` after any punctuation mark that is followed by another.
fn split_punctuation_runs(token: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev_punct = false;
    for (i, c) in token.char_indices() {
        let punct = c.is_ascii_punctuation();
        if punct && prev_punct {
            pieces.push(&token[start..i]);
            start = i;
        }
        prev_punct = punct;
    }
    pieces.push(&token[start..]);
    pieces
}
