//! Acceptance rules consulted before a candidate is added to a sentence.

use crate::phrase::{Phrase, PhraseFilter};
use crate::pool::LetterPool;

/// Decides whether `candidate` may follow `sentence`.
///
/// `pool` is the pool before the candidate's letters are taken. The
/// candidate is always spellable from it.
pub trait Rule: Send + Sync {
    fn accepts(&self, candidate: &Phrase, sentence: &str, pool: &LetterPool) -> bool;
}

impl<F> Rule for F
where
    F: Fn(&Phrase, &str, &LetterPool) -> bool + Send + Sync,
{
    fn accepts(&self, candidate: &Phrase, sentence: &str, pool: &LetterPool) -> bool {
        self(candidate, sentence, pool)
    }
}

/// Rejects a candidate whose first word repeats the sentence's last word,
/// ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRepeatedWords;

impl Rule for NoRepeatedWords {
    fn accepts(&self, candidate: &Phrase, sentence: &str, _pool: &LetterPool) -> bool {
        let (start, len) = crate::phrase::last_word(sentence);
        len == 0 || !sentence[start..start + len].eq_ignore_ascii_case(candidate.first_word())
    }
}

/// The finished sentence must end with this letter.
///
/// As a [`Rule`], a candidate that would empty the pool must end with the
/// letter, and one that would use up the last copies of it early is
/// rejected. As a [`PhraseFilter`], phrases that use every copy of the
/// letter without ending in it are dropped at load time.
#[derive(Debug, Clone, Copy)]
pub struct EndsWithLetter(pub char);

impl EndsWithLetter {
    fn ends_with_letter(&self, phrase: &Phrase) -> bool {
        phrase
            .text()
            .chars()
            .rev()
            .find(char::is_ascii_alphabetic)
            .map_or(false, |c| c == self.0)
    }

    fn uses_every(&self, phrase: &Phrase, pool: &LetterPool) -> bool {
        let used = phrase.text().chars().filter(|&c| c == self.0).count();
        used > 0 && used as u32 >= pool.count(self.0)
    }
}

impl Rule for EndsWithLetter {
    fn accepts(&self, candidate: &Phrase, _sentence: &str, pool: &LetterPool) -> bool {
        if candidate.letter_count() == pool.total_count() {
            self.ends_with_letter(candidate)
        } else {
            !self.uses_every(candidate, pool)
        }
    }
}

impl PhraseFilter for EndsWithLetter {
    fn accepts(&self, phrase: &Phrase, pool: &LetterPool) -> bool {
        !self.uses_every(phrase, pool) || self.ends_with_letter(phrase)
    }
}

/// Allows at most one word of each of the listed letter counts per sentence.
#[derive(Debug, Clone, Default)]
pub struct UniqueWordLengths(pub Vec<usize>);

impl UniqueWordLengths {
    fn word_lengths(text: &str) -> impl Iterator<Item = usize> + '_ {
        text.split(' ')
            .map(|w| w.chars().filter(char::is_ascii_alphabetic).count())
            .filter(|&n| n > 0)
    }
}

impl Rule for UniqueWordLengths {
    fn accepts(&self, candidate: &Phrase, sentence: &str, _pool: &LetterPool) -> bool {
        let mut used: Vec<usize> = Self::word_lengths(sentence)
            .filter(|n| self.0.contains(n))
            .collect();
        for n in Self::word_lengths(candidate.text()) {
            if self.0.contains(&n) {
                if used.contains(&n) {
                    return false;
                }
                used.push(n);
            }
        }
        true
    }
}
