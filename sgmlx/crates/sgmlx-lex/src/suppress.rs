//! Suppression tables for multi-vocabulary recognition.
//!
//! When several vocabularies are active at once, some characters always mean
//! "leave this vocabulary" whatever follows them. A [`SuppressionTable`] maps
//! their class codes straight to a token so the recognizer can report it
//! after one character without walking the automaton.

use crate::token::Token;
use crate::xchar::ClassCode;

/// Class code to token map consulted on the first character of a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuppressionTable {
    entries: Box<[Option<Token>]>,
    len: usize,
}

impl SuppressionTable {
    /// An empty table covering class codes `0..alphabet_size`.
    pub fn new(alphabet_size: usize) -> Self {
        Self {
            entries: vec![None; alphabet_size].into_boxed_slice(),
            len: 0,
        }
    }

    /// Maps `code` to `token`, returning the previous entry.
    ///
    /// # Panics
    ///
    /// Panics if `code` is outside the table's alphabet.
    pub fn insert(&mut self, code: ClassCode, token: Token) -> Option<Token> {
        let previous = self.entries[code as usize].replace(token);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// The token for `code`, if suppressed.
    #[inline]
    pub fn get(&self, code: ClassCode) -> Option<Token> {
        self.entries.get(code as usize).copied().flatten()
    }

    /// Number of suppressed class codes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no class code is suppressed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of class codes the table covers.
    pub fn alphabet_size(&self) -> usize {
        self.entries.len()
    }
}
