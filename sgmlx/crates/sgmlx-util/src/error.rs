//! Error types for sgmlx-util.

use thiserror::Error;

/// Error raised when a source snippet cannot be cut out for a span.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnippetError {
    /// The span starts after it ends.
    #[error("Invalid span: start {start} > end {end}")]
    InvalidSpan { start: usize, end: usize },

    /// The span reaches past the end of the source text.
    #[error("Span out of bounds: source has {source_len} bytes, span is {span_start}..{span_end}")]
    OutOfBounds {
        source_len: usize,
        span_start: usize,
        span_end: usize,
    },

    /// The span does not start on a character boundary.
    #[error("Span start {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Result type alias for snippet extraction.
pub type SnippetResult<T> = std::result::Result<T, SnippetError>;
