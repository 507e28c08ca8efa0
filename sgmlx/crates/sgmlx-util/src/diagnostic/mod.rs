//! Diagnostic module - errors found in the input text.
//!
//! The input layer reports what it meets while reading (a character the
//! syntax declares non-SGML, for instance) to a [`Handler`]. Reporting never
//! stops recognition; callers look at the handler between tokens or once
//! the text is consumed.
//!
//! ```
//! use sgmlx_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use sgmlx_util::span::Span;
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("non-SGML character U+0001")
//!     .code(DiagnosticCode::E_LEXER_NON_SGML_CHAR)
//!     .span(Span::new(4, 5, 1, 5))
//!     .emit(&handler);
//!
//! assert_eq!(handler.error_count(), 1);
//! ```

mod codes;
mod snippet;

pub use codes::DiagnosticCode;
pub use snippet::SourceSnippet;

use crate::span::Span;
use std::cell::RefCell;
use std::fmt;

/// An error in the input text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub message: String,
    /// Where
    pub span: Span,
    /// Stable code, when the error has one
    pub code: Option<DiagnosticCode>,
    /// The offending source line, once a renderer has cut it out
    pub snippet: Option<SourceSnippet>,
}

impl Diagnostic {
    /// Attach the source line shown under the message.
    pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippet = Some(snippet);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "error[{}]: {}", code, self.message)?,
            None => write!(f, "error: {}", self.message)?,
        }
        if self.span != Span::DUMMY {
            write!(f, " at {}", self.span)?;
        }
        if let Some(snippet) = &self.snippet {
            write!(f, "\n{}", snippet.format())?;
        }
        Ok(())
    }
}

/// Fluent construction of a [`Diagnostic`]
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Start an error with `message` and no location.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            diagnostic: Diagnostic {
                message: message.into(),
                span: Span::DUMMY,
                code: None,
                snippet: None,
            },
        }
    }

    /// Set the code
    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.diagnostic.code = Some(code);
        self
    }

    /// Set the location
    pub fn span(mut self, span: Span) -> Self {
        self.diagnostic.span = span;
        self
    }

    /// Finish without reporting.
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }

    /// Finish and report to `handler`.
    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}

/// Collects the diagnostics of one parse
///
/// Reporting takes `&self`, so a cursor can hold a shared reference while
/// the caller keeps reading results. A handler is not shared across threads;
/// the CLI gives every file its own.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// An empty handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `diagnostic`.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Whether anything was reported
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Number of reported errors
    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Copy of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain everything reported so far.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}
