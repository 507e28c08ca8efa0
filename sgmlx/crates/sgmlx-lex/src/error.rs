//! Error types for building class partitions, automata and syntaxes.
//!
//! Recognition itself never fails; everything here is raised while a syntax
//! is being compiled.

use thiserror::Error;

use crate::token::{Priority, Token};
use crate::xchar::ClassCode;

/// Errors raised by [`AutomatonBuilder`](crate::AutomatonBuilder).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A definition with no positions.
    #[error("token definition has no positions")]
    EmptyDefinition,

    /// A position that accepts no class code at all.
    #[error("position {position} of a token definition accepts no class")]
    EmptyPosition {
        /// Zero-based index of the offending position.
        position: usize,
    },

    /// A class code the automaton alphabet does not contain.
    #[error("class code {code} is outside an alphabet of {alphabet_size} classes")]
    CodeOutOfRange {
        /// The offending code.
        code: ClassCode,
        /// Number of classes the builder was created with.
        alphabet_size: usize,
    },

    /// Token 0 cannot be defined.
    #[error("token {0} is reserved for unrecognized input")]
    ReservedToken(Token),

    /// Two definitions end on the same node with the same priority.
    #[error("tokens {existing} and {new} match the same input with equal priority {priority}")]
    Ambiguous {
        /// Token already on the node.
        existing: Token,
        /// Token being defined.
        new: Token,
        /// Priority shared by both.
        priority: Priority,
    },

    /// A blank run attached to a node that also continues with ordinary
    /// transitions.
    #[error("blank run at depth {depth} is attached to a node with further transitions")]
    BlankRunOnInteriorNode {
        /// Depth of the node.
        depth: usize,
    },

    /// Two blank runs on one node disagree on their parameters.
    #[error("blank runs at depth {depth} disagree on blank classes, bound or fallback")]
    BlankRunConflict {
        /// Depth of the node.
        depth: usize,
    },

    /// A blank run whose blank set is empty.
    #[error("blank run has no blank classes")]
    EmptyBlankSet,

    /// A blank run with no suffix.
    #[error("blank run has an empty suffix")]
    EmptySuffix,

    /// Suffixes inside one blank run must share one length.
    #[error("blank run suffix has length {found}, other suffixes on this node have length {expected}")]
    SuffixLength {
        /// Length of the suffixes already defined.
        expected: usize,
        /// Length of the new suffix.
        found: usize,
    },

    /// A blank run that folds blanks into its fallback needs a token of its
    /// own on the prefix node.
    #[error("blank run at depth {depth} absorbs blanks but its prefix defines no token")]
    BlankRunWithoutBase {
        /// Depth of the node.
        depth: usize,
    },
}

/// Errors raised by [`ClassPartition`](crate::ClassPartition).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// The category mask is full.
    #[error("at most {limit} categories can be declared")]
    TooManyCategories {
        /// Maximum number of categories.
        limit: usize,
    },

    /// Refinement produced more classes than a class code can name.
    #[error("partition exceeds {limit} equivalence classes")]
    TooManyClasses {
        /// Maximum number of classes.
        limit: usize,
    },

    /// A category name used twice.
    #[error("category `{0}` is declared twice")]
    DuplicateCategory(String),
}

/// Errors raised while reading or compiling a syntax description.
#[derive(Error, Debug)]
pub enum SyntaxError {
    /// The description is not valid TOML or does not match the schema.
    #[error("invalid syntax description: {0}")]
    Parse(#[from] toml::de::Error),

    /// A character spec that cannot be read.
    #[error("bad character spec `{spec}`: {reason}")]
    BadCharSpec {
        /// The spec as written.
        spec: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `{category}` reference to an undeclared category.
    #[error("token `{token}` refers to unknown category `{category}`")]
    UnknownCategory {
        /// Token being compiled, or the referring section.
        token: String,
        /// The missing category.
        category: String,
    },

    /// A token name that is not defined.
    #[error("mode `{mode}` refers to unknown token `{token}`")]
    UnknownToken {
        /// Mode holding the reference.
        mode: String,
        /// The missing token.
        token: String,
    },

    /// A mode name that is not defined.
    #[error("unknown mode `{0}`")]
    UnknownMode(String),

    /// A token name defined twice.
    #[error("token `{0}` is defined twice")]
    DuplicateToken(String),

    /// A mode name defined twice.
    #[error("mode `{0}` is defined twice")]
    DuplicateMode(String),

    /// The description declares no modes.
    #[error("syntax `{0}` declares no modes")]
    NoModes(String),

    /// A suppressed token must match exactly one character.
    #[error("mode `{mode}` suppresses `{token}`, which is not a single-character token")]
    NotSuppressible {
        /// Mode holding the suppression.
        mode: String,
        /// The token.
        token: String,
    },

    /// Categories declared disjoint share characters.
    #[error("categories {categories:?} overlap at {example}")]
    Overlap {
        /// The overlapping categories.
        categories: Vec<String>,
        /// One shared character.
        example: String,
    },

    /// A token with both a lookahead and a blank run.
    #[error("token `{0}` combines a lookahead with a blank run")]
    LookaheadWithBlankRun(String),

    /// The automaton for a token could not be built.
    #[error("cannot build token `{token}`: {source}")]
    Build {
        /// Token being defined.
        token: String,
        /// Underlying builder error.
        #[source]
        source: BuildError,
    },

    /// A mode's automaton could not be frozen.
    #[error("cannot build mode `{mode}`: {source}")]
    ModeBuild {
        /// The mode.
        mode: String,
        /// Underlying builder error.
        #[source]
        source: BuildError,
    },

    /// The character categories could not be partitioned.
    #[error(transparent)]
    Partition(#[from] PartitionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_display() {
        let err = BuildError::Ambiguous {
            existing: Token(1),
            new: Token(2),
            priority: 0,
        };
        assert_eq!(
            err.to_string(),
            "tokens #1 and #2 match the same input with equal priority 0"
        );
    }

    #[test]
    fn test_partition_error_display() {
        let err = PartitionError::TooManyCategories { limit: 128 };
        assert_eq!(err.to_string(), "at most 128 categories can be declared");
    }

    #[test]
    fn test_build_error_source_chain() {
        use std::error::Error as _;
        let err = SyntaxError::Build {
            token: "tagc".to_string(),
            source: BuildError::EmptySuffix,
        };
        assert_eq!(err.to_string(), "cannot build token `tagc`: blank run has an empty suffix");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_partition_error_is_transparent() {
        let err: SyntaxError = PartitionError::DuplicateCategory("blank".into()).into();
        assert_eq!(err.to_string(), "category `blank` is declared twice");
    }
}
