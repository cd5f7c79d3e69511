use std::fmt;

use super::byte_string::ByteString;
use super::error::{Error, Result};
use super::state::{EMPTY_SLOT, FINAL_SYMBOL};

/// The compact, immutable automaton.
///
/// All transitions live in two parallel arrays: a state is a base offset `b`,
/// and it has a transition on symbol `s` iff `symbols[b + s] == s`, in which
/// case the target state's base is `targets[b + s]`. A state is final iff its
/// `0xff` slot carries the `0xff` marker; the target half of that slot is
/// never consulted.
///
/// The structure is read-only and safe to share across threads; concurrent
/// queries go through independent [`Cursor`] values.
#[derive(Clone)]
pub struct Fsa {
    pub(crate) symbols: Vec<u8>,
    pub(crate) targets: Vec<i32>,
    pub(crate) start: i32,
}

impl Fsa {
    /// Invariant assumed everywhere below: `0 <= start <= len - 256`, and
    /// every populated non-reserved slot's target is in the same range, so
    /// `base + symbol` never leaves the arrays. The packer produces such
    /// arrays and the file reader validates them.
    pub(crate) fn new(symbols: Vec<u8>, targets: Vec<i32>, start: i32) -> Self {
        debug_assert_eq!(symbols.len(), targets.len());
        debug_assert!(start >= 0 && start as usize + 256 <= symbols.len());
        Fsa {
            symbols,
            targets,
            start,
        }
    }

    /// Returns a cursor positioned at the start state.
    pub fn start(&self) -> Cursor<'_> {
        Cursor {
            fsa: self,
            base: self.start,
            valid: true,
        }
    }

    /// Tests whether `key` is a member of the automaton's key set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedByte`] if `key` contains `0x00` or `0xff`.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let mut cursor = self.start();
        cursor.consume(key)?;
        Ok(cursor.is_valid() && cursor.is_final())
    }

    /// Returns every accepted key, in [`ByteString`] order.
    ///
    /// The traversal is a depth-first walk trying symbols in ascending order;
    /// the finality marker `0xff` sorts last, which is what puts longer keys
    /// before their prefixes, matching the key order.
    pub fn dictionary(&self) -> Vec<ByteString> {
        let mut words = Vec::new();
        let mut word = Vec::new();
        self.collect_words(self.start, &mut word, &mut words);
        words
    }

    fn collect_words(&self, base: i32, word: &mut Vec<u8>, out: &mut Vec<ByteString>) {
        for symbol in 1..=u8::MAX {
            let slot = base as usize + symbol as usize;
            if self.symbols[slot] != symbol {
                continue;
            }
            if symbol == FINAL_SYMBOL {
                out.push(ByteString::from(word.as_slice()));
            } else {
                word.push(symbol);
                self.collect_words(self.targets[slot], word, out);
                word.pop();
            }
        }
    }
}

impl fmt::Debug for Fsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsa")
            .field("slots", &self.symbols.len())
            .field("start", &self.start)
            .finish()
    }
}

/// A mutable position in a compact automaton.
///
/// A cursor is a small value type: copying or [cloning](Clone) one is O(1)
/// and gives an independent position, which makes branching exploration of a
/// common prefix cheap. Once a cursor leaves the set of live paths it turns
/// invalid and stays invalid through any further consumption.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    fsa: &'a Fsa,
    base: i32,
    valid: bool,
}

impl Cursor<'_> {
    /// Advances over a single byte; returns the resulting validity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedByte`] for `0x00` and `0xff` without touching
    /// the cursor; those bytes never label a real transition.
    pub fn step(&mut self, symbol: u8) -> Result<bool> {
        if symbol == EMPTY_SLOT || symbol == FINAL_SYMBOL {
            return Err(Error::ReservedByte(symbol));
        }
        if self.valid {
            let slot = self.base as usize + symbol as usize;
            if self.fsa.symbols[slot] == symbol {
                self.base = self.fsa.targets[slot];
            } else {
                self.valid = false;
            }
        }
        Ok(self.valid)
    }

    /// Advances over a sequence of bytes, stopping at the first
    /// invalidation; returns the resulting validity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedByte`] if a reserved byte is reached before
    /// the cursor turns invalid.
    pub fn consume(&mut self, input: impl AsRef<[u8]>) -> Result<bool> {
        for &byte in input.as_ref() {
            if !self.step(byte)? {
                break;
            }
        }
        Ok(self.valid)
    }

    /// True while the consumed bytes form a prefix of at least one key.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True if the cursor is valid and the consumed bytes form a complete
    /// key.
    pub fn is_final(&self) -> bool {
        self.valid
            && self.fsa.symbols[self.base as usize + FINAL_SYMBOL as usize] == FINAL_SYMBOL
    }
}
