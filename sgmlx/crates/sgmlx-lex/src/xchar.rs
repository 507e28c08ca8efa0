//! Extended characters and class codes.
//!
//! An [`Xchar`] is a Unicode scalar value widened with one extra value, the
//! end-of-input sentinel. The domain is contiguous: the sentinel is `-1`
//! and real characters run from `0` to [`Xchar::MAX`].

use std::fmt;

/// Small integer naming one equivalence class of characters.
pub type ClassCode = u16;

/// A character code extended with an end-of-input sentinel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Xchar(i32);

impl Xchar {
    /// The end-of-input sentinel.
    pub const EOF: Xchar = Xchar(-1);

    /// The smallest value of the domain (the sentinel).
    pub const MIN: Xchar = Self::EOF;

    /// The largest supported code point.
    pub const MAX: Xchar = Xchar(0x10FFFF);

    /// Builds an `Xchar` from a raw code, returning `None` outside the domain.
    #[inline]
    pub const fn new(code: i32) -> Option<Xchar> {
        if code >= -1 && code <= 0x10FFFF {
            Some(Xchar(code))
        } else {
            None
        }
    }

    /// Builds an `Xchar` from a code point known to be in range.
    ///
    /// # Panics
    ///
    /// Panics if `code` exceeds [`Xchar::MAX`].
    #[inline]
    pub const fn from_u32(code: u32) -> Xchar {
        assert!(code <= 0x10FFFF, "code point out of range");
        Xchar(code as i32)
    }

    /// The raw code: `-1` for the sentinel, the code point otherwise.
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Whether this is the end-of-input sentinel.
    #[inline]
    pub const fn is_eof(self) -> bool {
        self.0 < 0
    }

    /// The character, if this is not the sentinel and is a scalar value.
    #[inline]
    pub fn to_char(self) -> Option<char> {
        u32::try_from(self.0).ok().and_then(char::from_u32)
    }

    /// The next value in the domain, saturating at [`Xchar::MAX`].
    #[inline]
    pub(crate) const fn succ(self) -> Xchar {
        if self.0 >= 0x10FFFF {
            self
        } else {
            Xchar(self.0 + 1)
        }
    }

    /// The previous value in the domain, saturating at the sentinel.
    #[inline]
    pub(crate) const fn pred(self) -> Xchar {
        if self.0 <= -1 {
            self
        } else {
            Xchar(self.0 - 1)
        }
    }
}

impl From<char> for Xchar {
    #[inline]
    fn from(c: char) -> Self {
        Xchar(c as i32)
    }
}

impl fmt::Debug for Xchar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            write!(f, "Xchar(EOF)")
        } else {
            write!(f, "Xchar(U+{:04X})", self.0)
        }
    }
}

impl fmt::Display for Xchar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            write!(f, "EOF")
        } else {
            write!(f, "U+{:04X}", self.0)
        }
    }
}
