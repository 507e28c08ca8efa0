//! sgmlx-lex - Token recognition for SGML-family markup syntaxes
//!
//! Markup syntaxes of the SGML family let documents redefine their
//! delimiters, and allow runs of blanks to belong to a delimiter or not
//! depending on what follows them. This crate recognizes the single longest
//! token at a cursor under such a syntax.
//!
//! # Overview
//!
//! Recognition is table driven:
//!
//! 1. A [`ClassTable`] maps every character (and the end-of-input sentinel)
//!    to the [`ClassCode`] of its equivalence class.
//! 2. An [`Automaton`] walks class codes to a terminal node. Terminals may
//!    carry a [`BlankExtension`] that resolves trailing blank runs.
//! 3. A [`Recognizer`] binds both, optionally with a [`SuppressionTable`],
//!    and commits the result on an [`InputCursor`].
//!
//! Tables and automata are usually produced by compiling a declarative
//! [`SyntaxConfig`]; [`TokenStream`] then reads a whole text mode by mode.
//!
//! # Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use sgmlx_lex::{AutomatonBuilder, ClassTable, Recognizer, SourceCursor, Token, Xchar};
//! use sgmlx_util::Handler;
//!
//! // class 0: anything, class 1: '<', class 2: '/'
//! let mut table = ClassTable::new(0);
//! table.set_char(Xchar::from('<'), 1);
//! table.set_char(Xchar::from('/'), 2);
//!
//! let mut builder = AutomatonBuilder::new(3);
//! builder.define(&[vec![1]], Token(1), 0).unwrap();
//! builder.define(&[vec![1], vec![2]], Token(2), 0).unwrap();
//!
//! let recognizer = Recognizer::new(Arc::new(table), builder.build().unwrap());
//! let handler = Handler::new();
//! let mut cursor = SourceCursor::new("</x");
//!
//! assert_eq!(recognizer.recognize(&mut cursor, &handler), Token(2));
//! assert_eq!(recognizer.recognize(&mut cursor, &handler), Token::UNRECOGNIZED);
//! assert!(cursor.is_at_end());
//! ```
//!
//! # Module Structure
//!
//! - [`xchar`] - Extended characters and class codes
//! - [`class_table`] - The two-tier equivalence-class table
//! - [`charset`] - Range sets of characters
//! - [`partition`] - Build-time refinement of categories into classes
//! - [`automaton`] - Frozen trie nodes and blank extensions
//! - [`builder`] - Construction of automata from token definitions
//! - [`suppress`] - Immediate dispatch tables
//! - [`cursor`] - The input capability and a string cursor
//! - [`recognizer`] - The recognition driver
//! - [`stream`] - Mode-switching token streams
//! - [`syntax`] - Declarative syntax descriptions
//! - [`token`] - Token identifiers

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod automaton;
pub mod builder;
pub mod charset;
pub mod class_table;
pub mod cursor;
pub mod error;
pub mod partition;
pub mod recognizer;
pub mod stream;
pub mod suppress;
pub mod syntax;
pub mod token;
pub mod xchar;

// Re-export main types for convenience
pub use automaton::{Automaton, BlankExtension, Interior, Node, Terminal};
pub use builder::{AutomatonBuilder, BlankRun};
pub use charset::CharSet;
pub use class_table::ClassTable;
pub use cursor::{InputCursor, SourceCursor};
pub use error::{BuildError, PartitionError, SyntaxError};
pub use partition::{CategoryId, ClassPartition, EquivalenceClass};
pub use recognizer::Recognizer;
pub use stream::{Lexeme, TokenStream};
pub use suppress::SuppressionTable;
pub use syntax::{CompiledSyntax, Mode, ModeId, SyntaxConfig};
pub use token::{Priority, Token};
pub use xchar::{ClassCode, Xchar};
