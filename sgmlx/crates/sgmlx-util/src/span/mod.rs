//! Span module - where a token sits in the input.
//!
//! A [`Span`] is a half-open byte range plus the 1-based line and column of
//! its first character. Columns count characters, not bytes.
//!
//! ```
//! use sgmlx_util::span::Span;
//!
//! let span = Span::new(4, 5, 2, 1);
//! assert_eq!(span.to_string(), "2:1");
//! ```

/// Location of a token or diagnostic in one source string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// First byte
    pub start: usize,
    /// One past the last byte
    pub end: usize,
    /// Line of the first character (1-based)
    pub line: u32,
    /// Column of the first character (1-based)
    pub column: u32,
}

impl Span {
    /// Placeholder for diagnostics that have no location yet.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
    };

    /// Create a span
    #[inline]
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(10, 20, 1, 5);
        assert_eq!((span.start, span.end), (10, 20));
        assert_eq!((span.line, span.column), (1, 5));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(0, 1, 12, 3).to_string(), "12:3");
    }

    #[test]
    fn test_default_is_dummy() {
        assert_eq!(Span::default(), Span::DUMMY);
        assert_ne!(Span::new(0, 0, 1, 1), Span::DUMMY);
    }
}
