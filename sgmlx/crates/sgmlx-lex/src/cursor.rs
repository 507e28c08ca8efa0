//! Input cursors.
//!
//! The recognizer reads characters tentatively: it may look further ahead
//! than the token it finally reports. An [`InputCursor`] therefore separates
//! *reading* ([`InputCursor::next_char`]) from *committing*
//! ([`InputCursor::end_token`]); only the committed length moves the cursor.

use sgmlx_util::{DiagnosticBuilder, DiagnosticCode, Handler, Span};

use crate::charset::CharSet;
use crate::xchar::Xchar;

/// The input capability the recognizer drives.
pub trait InputCursor {
    /// Marks the current position as the start of a token and rewinds any
    /// tentative reads.
    fn start_token(&mut self);

    /// Reads the next character of the current token, or [`Xchar::EOF`] past
    /// the end. Problems with the input are reported to `handler`.
    fn next_char(&mut self, handler: &Handler) -> Xchar;

    /// Whether suppressed characters should be dispatched immediately.
    fn suppression_active(&self) -> bool {
        true
    }

    /// Commits `length` characters from the token start and positions the
    /// cursor after them.
    fn end_token(&mut self, length: usize);
}

/// A cursor over an in-memory string.
///
/// Tracks byte offset, line and column of the committed position. Reading
/// past the end yields [`Xchar::EOF`] as often as asked; committing past the
/// end stops at the end.
///
/// # Example
///
/// ```
/// use sgmlx_lex::{InputCursor, SourceCursor, Xchar};
/// use sgmlx_util::Handler;
///
/// let handler = Handler::new();
/// let mut cursor = SourceCursor::new("<p>");
/// cursor.start_token();
/// assert_eq!(cursor.next_char(&handler), Xchar::from('<'));
/// assert_eq!(cursor.next_char(&handler), Xchar::from('p'));
/// cursor.end_token(1);
/// assert_eq!(cursor.position(), 1);
/// assert_eq!(cursor.column(), 2);
/// ```
pub struct SourceCursor<'a> {
    /// The text being traversed.
    source: &'a str,

    /// Committed byte position.
    position: usize,

    /// Line of the committed position (1-based).
    line: u32,

    /// Column of the committed position (1-based, in characters).
    column: u32,

    /// Byte position of the next tentative read.
    read_position: usize,

    /// Span of the last committed token.
    last_span: Span,

    /// Characters that are reported when read.
    non_sgml: Option<&'a CharSet>,

    /// Bytes before this offset have already been checked for non-SGML
    /// characters.
    checked_up_to: usize,

    suppression: bool,
}

impl<'a> SourceCursor<'a> {
    /// Creates a cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
            read_position: 0,
            last_span: Span::new(0, 0, 1, 1),
            non_sgml: None,
            checked_up_to: 0,
            suppression: true,
        }
    }

    /// Reports every character of `set` read from now on, once per position,
    /// as a non-SGML character.
    pub fn with_non_sgml(mut self, set: &'a CharSet) -> Self {
        self.non_sgml = Some(set);
        self
    }

    /// Turns suppression dispatch on or off.
    pub fn set_suppression(&mut self, active: bool) {
        self.suppression = active;
    }

    /// The source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Committed byte position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Line of the committed position.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the committed position.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Whether every character has been committed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Span of the most recently committed token.
    pub fn last_span(&self) -> Span {
        self.last_span
    }

    /// Decodes the character at byte offset `pos`.
    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        let b = *self.source.as_bytes().get(pos)?;
        // Fast path for ASCII
        if b < 128 {
            return Some(b as char);
        }
        self.source[pos..].chars().next()
    }

    fn report_non_sgml(&mut self, c: char, pos: usize, handler: &Handler) {
        let end = pos + c.len_utf8();
        if pos < self.checked_up_to {
            return;
        }
        self.checked_up_to = end;
        if !self.non_sgml.is_some_and(|set| set.contains(Xchar::from(c))) {
            return;
        }

        // line/column of a tentative read, counted from the committed point
        let (mut line, mut column) = (self.line, self.column);
        for ch in self.source[self.position..pos].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        DiagnosticBuilder::error(format!("non-SGML character {}", Xchar::from(c)))
            .code(DiagnosticCode::E_LEXER_NON_SGML_CHAR)
            .span(Span::new(pos, end, line, column))
            .emit(handler);
    }

    fn advance(&mut self) {
        let Some(c) = self.char_at(self.position) else {
            return;
        };
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl InputCursor for SourceCursor<'_> {
    fn start_token(&mut self) {
        self.read_position = self.position;
    }

    fn next_char(&mut self, handler: &Handler) -> Xchar {
        let pos = self.read_position;
        match self.char_at(pos) {
            Some(c) => {
                self.read_position += c.len_utf8();
                if self.non_sgml.is_some() {
                    self.report_non_sgml(c, pos, handler);
                }
                Xchar::from(c)
            }
            None => Xchar::EOF,
        }
    }

    fn suppression_active(&self) -> bool {
        self.suppression
    }

    fn end_token(&mut self, length: usize) {
        let (start, line, column) = (self.position, self.line, self.column);
        for _ in 0..length {
            if self.is_at_end() {
                break;
            }
            self.advance();
        }
        self.read_position = self.position;
        self.last_span = Span::new(start, self.position, line, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_tentative() {
        let handler = Handler::new();
        let mut cursor = SourceCursor::new("abc");
        cursor.start_token();
        assert_eq!(cursor.next_char(&handler), Xchar::from('a'));
        assert_eq!(cursor.next_char(&handler), Xchar::from('b'));
        assert_eq!(cursor.next_char(&handler), Xchar::from('c'));
        cursor.end_token(1);

        cursor.start_token();
        assert_eq!(cursor.next_char(&handler), Xchar::from('b'));
    }

    #[test]
    fn test_eof_repeats() {
        let handler = Handler::new();
        let mut cursor = SourceCursor::new("x");
        cursor.start_token();
        cursor.next_char(&handler);
        assert_eq!(cursor.next_char(&handler), Xchar::EOF);
        assert_eq!(cursor.next_char(&handler), Xchar::EOF);
    }

    #[test]
    fn test_commit_clamps_at_end() {
        let mut cursor = SourceCursor::new("ab");
        cursor.start_token();
        cursor.end_token(5);
        assert_eq!(cursor.position(), 2);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.last_span(), Span::new(0, 2, 1, 1));
    }

    #[test]
    fn test_line_and_column() {
        let mut cursor = SourceCursor::new("a\nbc");
        cursor.start_token();
        cursor.end_token(2);
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        cursor.start_token();
        cursor.end_token(1);
        assert_eq!((cursor.line(), cursor.column()), (2, 2));
        assert_eq!(cursor.last_span(), Span::new(2, 3, 2, 1));
    }

    #[test]
    fn test_multibyte_characters() {
        let handler = Handler::new();
        let mut cursor = SourceCursor::new("é\u{1F600}!");
        cursor.start_token();
        assert_eq!(cursor.next_char(&handler), Xchar::from('é'));
        assert_eq!(cursor.next_char(&handler), Xchar::from('\u{1F600}'));
        cursor.end_token(2);
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.column(), 3);
    }

    #[test]
    fn test_non_sgml_reported_once_per_position() {
        let handler = Handler::new();
        let bad = CharSet::from_chars(['\u{1}']);
        let mut cursor = SourceCursor::new("a\u{1}b").with_non_sgml(&bad);

        // read past the bad character, commit short, read it again
        cursor.start_token();
        cursor.next_char(&handler);
        cursor.next_char(&handler);
        cursor.end_token(1);
        cursor.start_token();
        cursor.next_char(&handler);
        cursor.end_token(1);

        let diagnostics = handler.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(DiagnosticCode::E_LEXER_NON_SGML_CHAR));
        assert_eq!(diagnostics[0].span, Span::new(1, 2, 1, 2));
    }

    #[test]
    fn test_suppression_flag() {
        let mut cursor = SourceCursor::new("");
        assert!(cursor.suppression_active());
        cursor.set_suppression(false);
        assert!(!cursor.suppression_active());
    }
}
