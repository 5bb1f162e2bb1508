use std::fmt;

/// Number of letters in the pool's alphabet.
pub const POOL_SIZE: usize = 26;

/// Index of `c` in the pool, if it belongs to the alphabet.
fn slot(c: char) -> Option<usize> {
    c.is_ascii_lowercase().then(|| c as usize - 'a' as usize)
}

/// A multiset of the letters `a` to `z`.
///
/// Only lowercase ASCII letters are counted. Everything else is ignored by
/// [`add`](LetterPool::add) and [`subtract`](LetterPool::subtract), and
/// spaces and punctuation are tolerated by [`can_spell`](LetterPool::can_spell).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LetterPool {
    counts: [u32; POOL_SIZE],
}

impl LetterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool holding the letters of `text`.
    pub fn from_letters(text: &str) -> Self {
        let mut pool = Self::new();
        pool.add(text);
        pool
    }

    pub fn reset(&mut self) {
        self.counts = [0; POOL_SIZE];
    }

    pub fn add(&mut self, text: &str) {
        for i in text.chars().filter_map(slot) {
            self.counts[i] += 1;
        }
    }

    /// Removes the letters of `text` from the pool.
    ///
    /// Only call this after `can_spell(text)` returned true for the current
    /// pool state. Debug builds panic on underflow.
    pub fn subtract(&mut self, text: &str) {
        for i in text.chars().filter_map(slot) {
            self.counts[i] -= 1;
        }
    }

    /// Whether the pool holds enough letters to spell `text`.
    ///
    /// Spaces and punctuation are ignored; any other character outside the
    /// alphabet (digits, uppercase, non-ASCII) makes the text unspellable.
    pub fn can_spell(&self, text: &str) -> bool {
        let mut seen = [0u32; POOL_SIZE];
        for c in text.chars() {
            match slot(c) {
                Some(i) => {
                    seen[i] += 1;
                    if seen[i] > self.counts[i] {
                        return false;
                    }
                }
                None if c.is_ascii_punctuation() || c.is_ascii_whitespace() => {}
                None => return false,
            }
        }
        true
    }

    /// Subtracts each word in turn, stopping at the first one that can't be
    /// spelled. On failure the pool is left as it was.
    pub fn spell_all<'w, I>(&mut self, words: I) -> bool
    where
        I: IntoIterator<Item = &'w str>,
    {
        let before = *self;
        for word in words {
            if !self.can_spell(word) {
                *self = before;
                return false;
            }
            self.subtract(word);
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    pub fn total_count(&self) -> usize {
        self.counts.iter().map(|&n| n as usize).sum()
    }

    /// Remaining count of `letter`; zero for anything outside the alphabet.
    pub fn count(&self, letter: char) -> u32 {
        slot(letter).map_or(0, |i| self.counts[i])
    }

    /// Overwrites `dst` with this pool's counts.
    pub fn copy_into(&self, dst: &mut LetterPool) {
        dst.counts = self.counts;
    }

    /// Letters with a non-zero count, alphabetically.
    pub fn letters(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(i, &n)| ((b'a' + i as u8) as char, n))
    }
}

impl fmt::Display for LetterPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (letter, n) in self.letters() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", letter, n)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for LetterPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LetterPool[{}]", self)
    }
}
