//! Incremental construction of token automata.
//!
//! Definitions are accumulated into a mutable trie and frozen by
//! [`AutomatonBuilder::build`]. Every position of a definition is a *set* of
//! class codes, so one definition can cover a category such as "any name
//! start character".
//!
//! Freezing fills in the fallback of every node: a node without a token of its
//! own reports its nearest ancestor's token and length. The root's fallback is
//! [`Token::UNRECOGNIZED`] with length 1.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::automaton::{Automaton, BlankExtension, Interior, Node, Terminal};
use crate::error::BuildError;
use crate::token::{Priority, Token};
use crate::xchar::ClassCode;

/// Blank-run parameters for [`AutomatonBuilder::define_blank_run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlankRun {
    /// Classes counting as blanks.
    pub codes: Vec<ClassCode>,
    /// Most blanks scanned before giving up.
    pub max_scan: usize,
    /// Whether scanned blanks are folded into the prefix token when no
    /// suffix follows.
    pub include_in_fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Assignment {
    token: Token,
    length: usize,
    priority: Priority,
}

#[derive(Default)]
struct TrieNode {
    children: FxHashMap<ClassCode, TrieNode>,
    assigned: Option<Assignment>,
    blank: Option<Box<TrieBlank>>,
}

struct TrieBlank {
    codes: Vec<ClassCode>,
    max_scan: usize,
    include_blanks: bool,
    suffix_length: usize,
    branches: TrieNode,
}

impl TrieNode {
    fn insert(&mut self, positions: &[Vec<ClassCode>], assignment: Assignment) -> Result<(), BuildError> {
        match positions.split_first() {
            None => self.assign(assignment),
            Some((codes, rest)) => {
                for &code in codes {
                    self.children.entry(code).or_default().insert(rest, assignment)?;
                }
                Ok(())
            },
        }
    }

    fn assign(&mut self, new: Assignment) -> Result<(), BuildError> {
        match self.assigned {
            None => self.assigned = Some(new),
            Some(old) if old.token == new.token && old.length == new.length => {
                self.assigned = Some(Assignment {
                    priority: old.priority.max(new.priority),
                    ..old
                });
            },
            Some(old) if new.priority > old.priority => self.assigned = Some(new),
            Some(old) if new.priority < old.priority => {},
            Some(old) => {
                return Err(BuildError::Ambiguous {
                    existing: old.token,
                    new: new.token,
                    priority: new.priority,
                });
            },
        }
        Ok(())
    }

    fn attach_blank(
        &mut self,
        prefix: &[Vec<ClassCode>],
        depth: usize,
        run: &BlankRun,
        suffix: &[Vec<ClassCode>],
        assignment: Assignment,
    ) -> Result<(), BuildError> {
        if let Some((codes, rest)) = prefix.split_first() {
            for &code in codes {
                self.children
                    .entry(code)
                    .or_default()
                    .attach_blank(rest, depth + 1, run, suffix, assignment)?;
            }
            return Ok(());
        }

        let mut codes = run.codes.clone();
        codes.sort_unstable();
        codes.dedup();

        let ext = match &mut self.blank {
            Some(ext) => {
                if ext.codes != codes
                    || ext.max_scan != run.max_scan
                    || ext.include_blanks != run.include_in_fallback
                {
                    return Err(BuildError::BlankRunConflict { depth });
                }
                if ext.suffix_length != suffix.len() {
                    return Err(BuildError::SuffixLength {
                        expected: ext.suffix_length,
                        found: suffix.len(),
                    });
                }
                ext
            },
            None => self.blank.insert(Box::new(TrieBlank {
                codes,
                max_scan: run.max_scan,
                include_blanks: run.include_in_fallback,
                suffix_length: suffix.len(),
                branches: TrieNode::default(),
            })),
        };
        ext.branches.insert(suffix, assignment)
    }
}

/// Accumulates token definitions and freezes them into an [`Automaton`].
///
/// # Examples
///
/// ```
/// use sgmlx_lex::{AutomatonBuilder, Token};
///
/// // classes: 0 = other, 1 = '<', 2 = '/', 3 = letter
/// let mut builder = AutomatonBuilder::new(4);
/// builder.define(&[vec![1]], Token(1), 0).unwrap();
/// builder.define_in_context(&[vec![1], vec![2]], &[vec![3]], Token(2), 0).unwrap();
/// let automaton = builder.build().unwrap();
///
/// let slash = automaton.root().child(1).next(2).unwrap();
/// // "</" alone falls back to "<"
/// assert_eq!(slash.token(), Token(1));
/// assert_eq!(slash.next(3).unwrap().consumed_length(), 2);
/// ```
pub struct AutomatonBuilder {
    alphabet_size: usize,
    root: TrieNode,
    definitions: usize,
}

impl AutomatonBuilder {
    /// Starts an empty automaton over class codes `0..alphabet_size`.
    pub fn new(alphabet_size: usize) -> Self {
        Self {
            alphabet_size,
            root: TrieNode::default(),
            definitions: 0,
        }
    }

    /// Number of class codes the automaton covers.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn check_positions(&self, positions: &[Vec<ClassCode>]) -> Result<(), BuildError> {
        for (position, codes) in positions.iter().enumerate() {
            if codes.is_empty() {
                return Err(BuildError::EmptyPosition { position });
            }
            self.check_codes(codes)?;
        }
        Ok(())
    }

    fn check_codes(&self, codes: &[ClassCode]) -> Result<(), BuildError> {
        match codes.iter().find(|&&code| code as usize >= self.alphabet_size) {
            Some(&code) => Err(BuildError::CodeOutOfRange {
                code,
                alphabet_size: self.alphabet_size,
            }),
            None => Ok(()),
        }
    }

    fn check_token(token: Token) -> Result<(), BuildError> {
        if token.is_recognized() {
            Ok(())
        } else {
            Err(BuildError::ReservedToken(token))
        }
    }

    /// Defines `token` as the character sequence `positions`.
    pub fn define(
        &mut self,
        positions: &[Vec<ClassCode>],
        token: Token,
        priority: Priority,
    ) -> Result<(), BuildError> {
        self.define_in_context(positions, &[], token, priority)
    }

    /// Defines `token` as `positions`, recognized only when `lookahead`
    /// follows. The lookahead characters are read but not committed.
    pub fn define_in_context(
        &mut self,
        positions: &[Vec<ClassCode>],
        lookahead: &[Vec<ClassCode>],
        token: Token,
        priority: Priority,
    ) -> Result<(), BuildError> {
        Self::check_token(token)?;
        if positions.is_empty() {
            return Err(BuildError::EmptyDefinition);
        }
        self.check_positions(positions)?;
        self.check_positions(lookahead)?;

        let path: Vec<Vec<ClassCode>> = positions.iter().chain(lookahead).cloned().collect();
        let assignment = Assignment {
            token,
            length: positions.len(),
            priority,
        };
        self.root.insert(&path, assignment)?;
        self.definitions += 1;
        trace!(%token, length = positions.len(), lookahead = lookahead.len(), priority, "token defined");
        Ok(())
    }

    /// Defines `token` as `prefix`, then up to `run.max_scan` blanks, then
    /// `suffix`.
    ///
    /// The run is attached to every node the prefix reaches. Those nodes must
    /// not continue with ordinary transitions, and all suffixes attached to
    /// one node must have the same length.
    pub fn define_blank_run(
        &mut self,
        prefix: &[Vec<ClassCode>],
        run: &BlankRun,
        suffix: &[Vec<ClassCode>],
        token: Token,
        priority: Priority,
    ) -> Result<(), BuildError> {
        Self::check_token(token)?;
        if prefix.is_empty() {
            return Err(BuildError::EmptyDefinition);
        }
        if run.codes.is_empty() {
            return Err(BuildError::EmptyBlankSet);
        }
        if suffix.is_empty() {
            return Err(BuildError::EmptySuffix);
        }
        self.check_positions(prefix)?;
        self.check_positions(suffix)?;
        self.check_codes(&run.codes)?;

        let assignment = Assignment {
            token,
            length: suffix.len(),
            priority,
        };
        self.root.attach_blank(prefix, 0, run, suffix, assignment)?;
        self.definitions += 1;
        trace!(%token, prefix = prefix.len(), suffix = suffix.len(), max_scan = run.max_scan, "blank run defined");
        Ok(())
    }

    /// Freezes the definitions into an automaton.
    pub fn build(self) -> Result<Automaton, BuildError> {
        let mut freezer = Freezer {
            alphabet_size: self.alphabet_size,
            node_count: 0,
            max_depth: 0,
        };
        let root = freezer.interior(&self.root, 0, (Token::UNRECOGNIZED, 1))?;
        debug!(
            alphabet = self.alphabet_size,
            definitions = self.definitions,
            nodes = freezer.node_count,
            max_depth = freezer.max_depth,
            "automaton built"
        );
        Ok(Automaton {
            root,
            alphabet_size: self.alphabet_size,
            max_depth: freezer.max_depth,
            node_count: freezer.node_count,
        })
    }
}

struct Freezer {
    alphabet_size: usize,
    node_count: usize,
    max_depth: usize,
}

impl Freezer {
    fn interior(
        &mut self,
        node: &TrieNode,
        depth: usize,
        here: (Token, usize),
    ) -> Result<Interior, BuildError> {
        self.node_count += 1;
        let children = (0..self.alphabet_size)
            .map(|code| match node.children.get(&(code as ClassCode)) {
                Some(child) => self.node(child, depth + 1, here),
                None => {
                    self.node_count += 1;
                    self.max_depth = self.max_depth.max(depth + 1);
                    Ok(Node::Terminal(Terminal::leaf(here.0, here.1)))
                },
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Interior {
            token: here.0,
            length: here.1,
            children: children.into_boxed_slice(),
        })
    }

    fn node(
        &mut self,
        node: &TrieNode,
        depth: usize,
        inherited: (Token, usize),
    ) -> Result<Node, BuildError> {
        let here = node
            .assigned
            .map_or(inherited, |assigned| (assigned.token, assigned.length));

        if !node.children.is_empty() {
            if node.blank.is_some() {
                return Err(BuildError::BlankRunOnInteriorNode { depth });
            }
            return self.interior(node, depth, here).map(Node::Interior);
        }

        self.node_count += 1;
        self.max_depth = self.max_depth.max(depth);
        let blank = match &node.blank {
            Some(ext) => Some(Box::new(self.blank(ext, depth, here)?)),
            None => None,
        };
        Ok(Node::Terminal(Terminal {
            token: here.0,
            length: here.1,
            blank,
        }))
    }

    fn blank(
        &mut self,
        ext: &TrieBlank,
        depth: usize,
        here: (Token, usize),
    ) -> Result<BlankExtension, BuildError> {
        // absorbed blanks must extend a real token, never an unrecognized one
        if ext.include_blanks && (here.1 != depth || !here.0.is_recognized()) {
            return Err(BuildError::BlankRunWithoutBase { depth });
        }

        let mut blank = vec![false; self.alphabet_size];
        for &code in &ext.codes {
            blank[code as usize] = true;
        }

        // branch walks start afresh: a failed branch reports no token
        let branches = (0..self.alphabet_size)
            .map(|code| {
                ext.branches
                    .children
                    .get(&(code as ClassCode))
                    .map(|child| self.node(child, 1, (Token::UNRECOGNIZED, 0)))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.max_depth = self
            .max_depth
            .max(depth + ext.max_scan + ext.suffix_length);
        Ok(BlankExtension {
            max_blanks: ext.max_scan,
            blank: blank.into_boxed_slice(),
            prefix_length: depth,
            additional_length: ext.suffix_length,
            include_blanks: ext.include_blanks,
            branches: branches.into_boxed_slice(),
        })
    }
}
