//! The source line shown under a diagnostic.

use crate::error::{SnippetError, SnippetResult};
use crate::span::Span;

/// One source line with a caret range under the offending characters
///
/// Columns are 1-based character counts; `end_column` is exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSnippet {
    /// The line, without its terminator
    pub line: String,
    /// Line number as printed in the gutter
    pub line_number: usize,
    /// First highlighted column
    pub start_column: usize,
    /// Column after the last highlighted one
    pub end_column: usize,
}

impl SourceSnippet {
    /// Cut the line containing `span` out of `source`.
    ///
    /// The highlight covers the span's characters, clipped to the end of the
    /// first line it touches, and is never narrower than one column.
    ///
    /// ```
    /// use sgmlx_util::diagnostic::SourceSnippet;
    /// use sgmlx_util::span::Span;
    ///
    /// let source = "<a>\n<b\u{1}>\n";
    /// let snippet = SourceSnippet::from_span(source, Span::new(6, 7, 2, 3)).unwrap();
    /// assert_eq!(snippet.line, "<b\u{1}>");
    /// assert_eq!((snippet.start_column, snippet.end_column), (3, 4));
    /// ```
    pub fn from_span(source: &str, span: Span) -> SnippetResult<Self> {
        if span.start > span.end {
            return Err(SnippetError::InvalidSpan {
                start: span.start,
                end: span.end,
            });
        }
        if span.end > source.len() {
            return Err(SnippetError::OutOfBounds {
                source_len: source.len(),
                span_start: span.start,
                span_end: span.end,
            });
        }
        if !source.is_char_boundary(span.start) {
            return Err(SnippetError::NotCharBoundary(span.start));
        }

        let line_start = source[..span.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[span.start..]
            .find('\n')
            .map_or(source.len(), |i| span.start + i);

        let start_column = source[line_start..span.start].chars().count() + 1;
        let width = source
            .get(span.start..span.end.min(line_end))
            .map_or(1, |s| s.chars().count().max(1));

        Ok(Self {
            line: source[line_start..line_end].to_string(),
            line_number: span.line as usize,
            start_column,
            end_column: start_column + width,
        })
    }

    /// The line in a numbered gutter, carets underneath.
    ///
    /// Control characters are printed escaped.
    pub fn format(&self) -> String {
        let gutter = self.line_number.to_string().len().max(3);
        let carets = self.end_column.saturating_sub(self.start_column).max(1);
        format!(
            "{:>gutter$} | {}\n{:>gutter$} | {}{}",
            self.line_number,
            self.line.escape_debug(),
            "",
            " ".repeat(self.start_column.saturating_sub(1)),
            "^".repeat(carets),
        )
    }
}
