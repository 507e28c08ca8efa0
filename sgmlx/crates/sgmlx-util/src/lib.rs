//! sgmlx-util - Spans and diagnostics shared by the sgmlx crates.
//!
//! The recognition engine itself never originates diagnostics; they come
//! from the input layer (for example a cursor that meets a non-SGML
//! character) and flow into a [`Handler`] owned by the caller.
//!
//! # Module Structure
//!
//! - [`span`] - Where a token or a diagnostic sits in the input
//! - [`diagnostic`] - Input errors, their codes and the collecting handler
//! - [`error`] - Errors raised while rendering diagnostics

#![warn(missing_docs)]

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, SourceSnippet};
pub use error::{SnippetError, SnippetResult};
pub use span::Span;
