//! Token identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relative weight of a token definition; the higher value wins when two
/// definitions end on the same automaton node.
pub type Priority = u16;

/// Identifier of a recognized lexical category.
///
/// Ids are assigned by whoever builds the automaton. Id 0 is reserved for
/// [`Token::UNRECOGNIZED`], the outcome for a single character that starts no
/// token.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub u32);

impl Token {
    /// One uncategorizable character of data.
    pub const UNRECOGNIZED: Token = Token(0);

    /// The raw id.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Whether this is a real token rather than [`Token::UNRECOGNIZED`].
    #[inline]
    pub const fn is_recognized(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for Token {
    fn from(id: u32) -> Self {
        Token(id)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
