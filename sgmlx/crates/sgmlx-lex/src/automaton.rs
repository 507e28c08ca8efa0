//! The token automaton.
//!
//! A depth-bounded trie keyed by class codes. Nodes come in two shapes:
//!
//! - [`Interior`]: reading one more character is required. It has a child
//!   for *every* class code, so a walk never gets stuck; children for codes
//!   that start no longer token are terminals carrying the fallback.
//! - [`Terminal`]: the walk stops here. It may carry a [`BlankExtension`]
//!   that decides whether a run of blanks that follows belongs to this
//!   token or to a longer one.
//!
//! Automata are produced by [`AutomatonBuilder`](crate::AutomatonBuilder)
//! and are immutable afterwards.

use crate::token::Token;
use crate::xchar::ClassCode;

/// A state of the token automaton.
#[derive(Clone, Debug)]
pub enum Node {
    /// A state that must read one more character.
    Interior(Interior),
    /// A state where matching stops.
    Terminal(Terminal),
}

impl Node {
    /// The child reached by consuming a character of class `code`, if this
    /// node has children.
    #[inline]
    pub fn next(&self, code: ClassCode) -> Option<&Node> {
        match self {
            Node::Interior(interior) => Some(interior.child(code)),
            Node::Terminal(_) => None,
        }
    }

    /// Whether the walk has to read another character here.
    #[inline]
    pub fn is_interior(&self) -> bool {
        matches!(self, Node::Interior(_))
    }

    /// Token reported if matching stops here.
    #[inline]
    pub fn token(&self) -> Token {
        match self {
            Node::Interior(interior) => interior.token,
            Node::Terminal(terminal) => terminal.token,
        }
    }

    /// Number of characters committed if matching stops here.
    #[inline]
    pub fn consumed_length(&self) -> usize {
        match self {
            Node::Interior(interior) => interior.length,
            Node::Terminal(terminal) => terminal.length,
        }
    }

    /// The attached blank extension, if any.
    #[inline]
    pub fn blank_extension(&self) -> Option<&BlankExtension> {
        match self {
            Node::Interior(_) => None,
            Node::Terminal(terminal) => terminal.blank.as_deref(),
        }
    }
}

/// A node with one child per class code.
#[derive(Clone, Debug)]
pub struct Interior {
    pub(crate) token: Token,
    pub(crate) length: usize,
    pub(crate) children: Box<[Node]>,
}

impl Interior {
    /// The child for `code`.
    ///
    /// # Panics
    ///
    /// Panics if `code` is outside the automaton's alphabet, which means the
    /// class table and the automaton were built for different syntaxes.
    #[inline]
    pub fn child(&self, code: ClassCode) -> &Node {
        &self.children[code as usize]
    }

    /// Token inherited by this node.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Length committed with [`Interior::token`].
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A node where matching stops.
#[derive(Clone, Debug)]
pub struct Terminal {
    pub(crate) token: Token,
    pub(crate) length: usize,
    pub(crate) blank: Option<Box<BlankExtension>>,
}

impl Terminal {
    pub(crate) fn leaf(token: Token, length: usize) -> Self {
        Self {
            token,
            length,
            blank: None,
        }
    }

    /// Token reported here.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Characters committed with [`Terminal::token`].
    pub fn length(&self) -> usize {
        self.length
    }

    /// The attached blank extension, if any.
    pub fn blank_extension(&self) -> Option<&BlankExtension> {
        self.blank.as_deref()
    }
}

/// Resolves a run of blanks following an ambiguous terminal.
///
/// After the terminal, up to [`max_blanks`](Self::max_blanks) blank
/// characters are scanned. A character whose class starts one of the
/// extension's own branches ends the scan and continues as a small trie walk;
/// if that walk ends on a token, the blanks and the branch belong to it.
/// Otherwise the terminal's own token wins, with or without the scanned
/// blanks depending on [`include_blanks`](Self::include_blanks).
#[derive(Clone, Debug)]
pub struct BlankExtension {
    pub(crate) max_blanks: usize,
    pub(crate) blank: Box<[bool]>,
    pub(crate) prefix_length: usize,
    pub(crate) additional_length: usize,
    pub(crate) include_blanks: bool,
    pub(crate) branches: Box<[Option<Node>]>,
}

impl BlankExtension {
    /// Upper bound on the number of blanks scanned.
    pub fn max_blanks(&self) -> usize {
        self.max_blanks
    }

    /// Whether class `code` counts as a blank.
    #[inline]
    pub fn is_blank(&self, code: ClassCode) -> bool {
        self.blank.get(code as usize).copied().unwrap_or(false)
    }

    /// Length of every branch match.
    pub fn additional_length(&self) -> usize {
        self.additional_length
    }

    /// Whether scanned blanks are folded into the fallback token.
    pub fn include_blanks(&self) -> bool {
        self.include_blanks
    }

    /// The branch started by class `code`, if any.
    #[inline]
    pub fn branch(&self, code: ClassCode) -> Option<&Node> {
        self.branches.get(code as usize).and_then(Option::as_ref)
    }

    /// Characters committed when a branch matches after `blanks` blanks.
    #[inline]
    pub fn matched_length(&self, blanks: usize) -> usize {
        self.prefix_length + self.additional_length + blanks
    }
}

/// A frozen token automaton.
#[derive(Clone, Debug)]
pub struct Automaton {
    pub(crate) root: Interior,
    pub(crate) alphabet_size: usize,
    pub(crate) max_depth: usize,
    pub(crate) node_count: usize,
}

impl Automaton {
    /// The start state. The root always reads at least one character.
    pub fn root(&self) -> &Interior {
        &self.root
    }

    /// Number of class codes every interior node covers.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Most characters a single recognition can read, blank runs included.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes, fallback leaves included.
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}
