//! The token recognizer.
//!
//! A [`Recognizer`] binds a shared [`ClassTable`], an owned [`Automaton`] and
//! optionally a shared [`SuppressionTable`] into a single operation:
//! find the longest token at the cursor and commit it.
//!
//! ```text
//! cursor ──char──▶ table ──class──▶ automaton ──▶ … ──▶ terminal
//!                                                       │
//!                              blank extension? ◀───────┘
//!                                                       │
//! cursor ◀──────────── commit(length) ◀── (token, length)
//! ```
//!
//! Recognition is bounded by [`Automaton::max_depth`] reads and never fails:
//! input that starts no token yields [`Token::UNRECOGNIZED`] with exactly one
//! character committed.

use std::sync::Arc;

use sgmlx_util::{Handler, Span};

use crate::automaton::{Automaton, BlankExtension, Node, Terminal};
use crate::class_table::ClassTable;
use crate::cursor::{InputCursor, SourceCursor};
use crate::suppress::SuppressionTable;
use crate::token::Token;
use crate::xchar::ClassCode;

/// Recognizes tokens of one vocabulary.
#[derive(Clone, Debug)]
pub struct Recognizer {
    table: Arc<ClassTable>,
    automaton: Automaton,
    suppression: Option<Arc<SuppressionTable>>,
}

impl Recognizer {
    /// Creates a single-vocabulary recognizer.
    ///
    /// # Panics
    ///
    /// Panics if the table can produce a class code the automaton does not
    /// cover.
    pub fn new(table: Arc<ClassTable>, automaton: Automaton) -> Self {
        assert!(
            automaton.alphabet_size() >= table.alphabet_size(),
            "automaton covers {} classes, table produces {}",
            automaton.alphabet_size(),
            table.alphabet_size()
        );
        Self {
            table,
            automaton,
            suppression: None,
        }
    }

    /// Creates a multi-vocabulary recognizer that dispatches suppressed
    /// classes without walking the automaton.
    ///
    /// # Panics
    ///
    /// Panics under the same condition as [`Recognizer::new`], or if the
    /// suppression table does not cover the table's alphabet.
    pub fn with_suppression(
        table: Arc<ClassTable>,
        automaton: Automaton,
        suppression: Arc<SuppressionTable>,
    ) -> Self {
        assert!(
            suppression.alphabet_size() >= table.alphabet_size(),
            "suppression table covers {} classes, table produces {}",
            suppression.alphabet_size(),
            table.alphabet_size()
        );
        Self {
            suppression: Some(suppression),
            ..Self::new(table, automaton)
        }
    }

    /// The shared class table.
    pub fn table(&self) -> &Arc<ClassTable> {
        &self.table
    }

    /// The automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The suppression table, in multi-vocabulary mode.
    pub fn suppression(&self) -> Option<&Arc<SuppressionTable>> {
        self.suppression.as_ref()
    }

    /// Recognizes the token at the cursor and commits it.
    ///
    /// The only effect on the cursor is advancing it by the committed
    /// length. Diagnostics raised while reading go to `handler`.
    pub fn recognize<C>(&self, cursor: &mut C, handler: &Handler) -> Token
    where
        C: InputCursor + ?Sized,
    {
        cursor.start_token();
        let (token, length) = self.resolve(cursor, handler);
        cursor.end_token(length);
        token
    }

    /// Like [`Recognizer::recognize`], also returning where the token lies.
    pub fn recognize_spanned(&self, cursor: &mut SourceCursor<'_>, handler: &Handler) -> (Token, Span) {
        let token = self.recognize(cursor, handler);
        (token, cursor.last_span())
    }

    #[inline]
    fn classify<C>(&self, cursor: &mut C, handler: &Handler) -> ClassCode
    where
        C: InputCursor + ?Sized,
    {
        self.table.lookup(cursor.next_char(handler))
    }

    fn resolve<C>(&self, cursor: &mut C, handler: &Handler) -> (Token, usize)
    where
        C: InputCursor + ?Sized,
    {
        let first = self.classify(cursor, handler);
        if let Some(suppression) = &self.suppression {
            if cursor.suppression_active() {
                if let Some(token) = suppression.get(first) {
                    return (token, 1);
                }
            }
        }

        let mut node = self.automaton.root().child(first);
        loop {
            match node {
                Node::Interior(interior) => node = interior.child(self.classify(cursor, handler)),
                Node::Terminal(terminal) => {
                    return match terminal.blank_extension() {
                        None => (terminal.token(), terminal.length()),
                        Some(ext) => self.resolve_blank_run(terminal, ext, cursor, handler),
                    };
                }
            }
        }
    }

    /// Scans blanks after `terminal`. A class with a branch transition ends
    /// the scan even when it also counts as a blank.
    fn resolve_blank_run<C>(
        &self,
        terminal: &Terminal,
        ext: &BlankExtension,
        cursor: &mut C,
        handler: &Handler,
    ) -> (Token, usize)
    where
        C: InputCursor + ?Sized,
    {
        let mut blanks = 0;
        loop {
            let code = self.classify(cursor, handler);
            if let Some(branch) = ext.branch(code) {
                let token = self.walk_branch(branch, cursor, handler);
                if token.is_recognized() {
                    return (token, ext.matched_length(blanks));
                }
                break;
            }
            if !ext.is_blank(code) || blanks == ext.max_blanks() {
                break;
            }
            blanks += 1;
        }

        let absorbed = if ext.include_blanks() { blanks } else { 0 };
        (terminal.token(), terminal.length() + absorbed)
    }

    fn walk_branch<C>(&self, mut node: &Node, cursor: &mut C, handler: &Handler) -> Token
    where
        C: InputCursor + ?Sized,
    {
        loop {
            match node {
                Node::Interior(interior) => node = interior.child(self.classify(cursor, handler)),
                Node::Terminal(terminal) => return terminal.token(),
            }
        }
    }
}
