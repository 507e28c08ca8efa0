//! Declarative syntax descriptions.
//!
//! A [`SyntaxConfig`] is read from TOML and compiled into a
//! [`CompiledSyntax`]: one shared [`ClassTable`] plus one [`Recognizer`] per
//! mode, with the token → mode transitions a [`TokenStream`] follows.
//!
//! ```toml
//! name = "tiny"
//!
//! [categories]
//! blank = ["U+0020", "U+0009"]
//! letter = ["a-z", "A-Z"]
//!
//! [[tokens]]
//! name = "stago"
//! pattern = ["<"]
//! lookahead = ["{letter}"]
//!
//! [[tokens]]
//! name = "tagc"
//! pattern = [">"]
//!
//! [[modes]]
//! name = "content"
//! ```
//!
//! Pattern elements are either `{category}` references, matching one
//! character of the category, or literal strings, matching their characters
//! in order. Every literal character gets a class of its own.
//!
//! A reference concrete syntax ships with the crate, see
//! [`SyntaxConfig::reference`].

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sgmlx_util::Handler;
use tracing::debug;

use crate::builder::{AutomatonBuilder, BlankRun};
use crate::charset::CharSet;
use crate::class_table::ClassTable;
use crate::error::SyntaxError;
use crate::partition::ClassPartition;
use crate::recognizer::Recognizer;
use crate::stream::TokenStream;
use crate::suppress::SuppressionTable;
use crate::token::{Priority, Token};
use crate::xchar::{ClassCode, Xchar};

/// Source text of the built-in reference concrete syntax.
pub const REFERENCE_SYNTAX: &str = include_str!("reference.toml");

/// Index of a mode inside a [`CompiledSyntax`].
pub type ModeId = usize;

/// A syntax description as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SyntaxConfig {
    /// Name of the syntax.
    pub name: String,

    /// Characters reported as non-SGML when read.
    #[serde(default)]
    pub non_sgml: Vec<String>,

    /// Groups of categories that must not share characters.
    #[serde(default)]
    pub disjoint: Vec<Vec<String>>,

    /// Named character categories.
    #[serde(default)]
    pub categories: IndexMap<String, Vec<String>>,

    /// Token definitions. Ids are assigned from 1 in this order.
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,

    /// Modes. The first one is the initial mode.
    #[serde(default)]
    pub modes: Vec<ModeConfig>,
}

/// One `[[tokens]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,

    /// The committed characters.
    pub pattern: Vec<String>,

    /// Characters that must follow but are not committed.
    #[serde(default)]
    pub lookahead: Vec<String>,

    /// Makes `pattern` the prefix of a blank run ending in `suffix`.
    #[serde(default)]
    pub blank_run: Option<BlankRunConfig>,

    /// Characters ending a blank run.
    #[serde(default)]
    pub suffix: Vec<String>,

    /// Weight against other tokens matching the same input.
    #[serde(default)]
    pub priority: Priority,

    /// Modes the token belongs to; empty means every mode.
    #[serde(default)]
    pub modes: Vec<String>,
}

/// Blank-run parameters of a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BlankRunConfig {
    /// Category of the blank characters.
    pub category: String,

    /// Most blanks scanned.
    pub max_scan: usize,

    /// Whether scanned blanks join the prefix token when no suffix follows.
    #[serde(default)]
    pub include_in_fallback: bool,
}

/// One `[[modes]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModeConfig {
    /// Mode name.
    pub name: String,

    /// Single-character tokens dispatched without walking the automaton.
    #[serde(default)]
    pub suppress: Vec<String>,

    /// Token name → mode entered after it.
    #[serde(default)]
    pub switch: IndexMap<String, String>,
}

impl SyntaxConfig {
    /// Parses a TOML description.
    pub fn from_toml(source: &str) -> Result<Self, SyntaxError> {
        Ok(toml::from_str(source)?)
    }

    /// The built-in reference concrete syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgmlx_lex::SyntaxConfig;
    ///
    /// let syntax = SyntaxConfig::reference().unwrap().compile().unwrap();
    /// assert_eq!(syntax.name(), "reference");
    /// assert!(syntax.mode_id("content").is_some());
    /// ```
    pub fn reference() -> Result<Self, SyntaxError> {
        Self::from_toml(REFERENCE_SYNTAX)
    }

    /// Compiles the description.
    pub fn compile(&self) -> Result<CompiledSyntax, SyntaxError> {
        if self.modes.is_empty() {
            return Err(SyntaxError::NoModes(self.name.clone()));
        }

        let partition = self.partition()?;
        let table = Arc::new(partition.into_table());
        let alphabet_size = partition.class_count();
        let non_sgml = parse_char_set(&self.non_sgml)?;

        let mut token_ids: FxHashMap<&str, Token> = FxHashMap::default();
        for (index, token) in self.tokens.iter().enumerate() {
            let id = Token(index as u32 + 1);
            if token_ids.insert(token.name.as_str(), id).is_some() {
                return Err(SyntaxError::DuplicateToken(token.name.clone()));
            }
        }

        let mut mode_ids: FxHashMap<&str, ModeId> = FxHashMap::default();
        for (index, mode) in self.modes.iter().enumerate() {
            if mode_ids.insert(mode.name.as_str(), index).is_some() {
                return Err(SyntaxError::DuplicateMode(mode.name.clone()));
            }
        }
        for mode in self.tokens.iter().flat_map(|t| &t.modes) {
            if !mode_ids.contains_key(mode.as_str()) {
                return Err(SyntaxError::UnknownMode(mode.clone()));
            }
        }

        let resolver = Resolver {
            partition: &partition,
            table: &table,
        };
        let plans = self
            .tokens
            .iter()
            .map(|token| resolver.plan(token))
            .collect::<Result<Vec<_>, _>>()?;

        let mut modes = IndexMap::with_capacity(self.modes.len());
        for mode in &self.modes {
            let mut builder = AutomatonBuilder::new(alphabet_size);
            for (index, (token, plan)) in self.tokens.iter().zip(&plans).enumerate() {
                if !token.modes.is_empty() && !token.modes.contains(&mode.name) {
                    continue;
                }
                let id = Token(index as u32 + 1);
                let defined = match &plan.blank_run {
                    Some(run) => builder.define_blank_run(&plan.pattern, run, &plan.suffix, id, token.priority),
                    None => builder.define_in_context(&plan.pattern, &plan.lookahead, id, token.priority),
                };
                defined.map_err(|source| SyntaxError::Build {
                    token: token.name.clone(),
                    source,
                })?;
            }
            let automaton = builder.build().map_err(|source| SyntaxError::ModeBuild {
                mode: mode.name.clone(),
                source,
            })?;

            let recognizer = if mode.suppress.is_empty() {
                Recognizer::new(Arc::clone(&table), automaton)
            } else {
                let mut suppression = SuppressionTable::new(alphabet_size);
                for name in &mode.suppress {
                    let id = lookup_token(&token_ids, &mode.name, name)?;
                    let plan = &plans[id.0 as usize - 1];
                    if plan.pattern.len() != 1 || !plan.lookahead.is_empty() || plan.blank_run.is_some() {
                        return Err(SyntaxError::NotSuppressible {
                            mode: mode.name.clone(),
                            token: name.clone(),
                        });
                    }
                    for &code in &plan.pattern[0] {
                        suppression.insert(code, id);
                    }
                }
                Recognizer::with_suppression(Arc::clone(&table), automaton, Arc::new(suppression))
            };

            let mut transitions = FxHashMap::default();
            for (token, target) in &mode.switch {
                let id = lookup_token(&token_ids, &mode.name, token)?;
                let next = *mode_ids
                    .get(target.as_str())
                    .ok_or_else(|| SyntaxError::UnknownMode(target.clone()))?;
                transitions.insert(id, next);
            }

            modes.insert(
                mode.name.clone(),
                Mode {
                    name: mode.name.clone(),
                    recognizer,
                    transitions,
                },
            );
        }

        debug!(
            syntax = %self.name,
            classes = alphabet_size,
            tokens = self.tokens.len(),
            modes = modes.len(),
            "syntax compiled"
        );
        Ok(CompiledSyntax {
            name: self.name.clone(),
            table,
            partition,
            token_names: self.tokens.iter().map(|t| t.name.clone()).collect(),
            modes,
            non_sgml,
        })
    }

    /// Declares the named categories, then one category per literal
    /// character, and checks the disjointness constraints.
    fn partition(&self) -> Result<ClassPartition, SyntaxError> {
        let mut partition = ClassPartition::new();
        for (name, specs) in &self.categories {
            partition.add_category(name.clone(), &parse_char_set(specs)?)?;
        }

        let mut literals = IndexSet::new();
        for token in &self.tokens {
            let elements = token.pattern.iter().chain(&token.lookahead).chain(&token.suffix);
            for element in elements.filter(|e| category_ref(e).is_none()) {
                literals.extend(element.chars());
            }
        }
        for c in literals {
            partition.add_category(format!("{c:?}"), &CharSet::from_chars([c]))?;
        }

        for group in &self.disjoint {
            let mut mask = 0u128;
            for name in group {
                let id = partition
                    .category_id(name)
                    .ok_or_else(|| SyntaxError::UnknownCategory {
                        token: "disjoint".to_string(),
                        category: name.clone(),
                    })?;
                mask |= 1u128 << id;
            }
            if let Some((_, class)) = partition.collisions(mask).first() {
                let example = class
                    .chars()
                    .ranges()
                    .first()
                    .map_or_else(String::new, |(lo, _)| lo.to_string());
                return Err(SyntaxError::Overlap {
                    categories: partition
                        .category_names(class.categories() & mask)
                        .into_iter()
                        .map(String::from)
                        .collect(),
                    example,
                });
            }
        }
        Ok(partition)
    }
}

fn lookup_token(ids: &FxHashMap<&str, Token>, mode: &str, name: &str) -> Result<Token, SyntaxError> {
    ids.get(name).copied().ok_or_else(|| SyntaxError::UnknownToken {
        mode: mode.to_string(),
        token: name.to_string(),
    })
}

/// `{name}` → `name`.
fn category_ref(element: &str) -> Option<&str> {
    element
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

/// Reads `a`, `a-z`, `U+0020` or `U+0041-U+005A`.
pub fn parse_char_spec(spec: &str) -> Result<(Xchar, Xchar), SyntaxError> {
    let bad = |reason: &str| SyntaxError::BadCharSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (lo, hi) = match split_range(spec) {
        Some((lo, hi)) => (
            parse_code_point(lo).map_err(|r| bad(&r))?,
            parse_code_point(hi).map_err(|r| bad(&r))?,
        ),
        None => {
            let c = parse_code_point(spec).map_err(|r| bad(&r))?;
            (c, c)
        },
    };
    if lo > hi {
        return Err(bad("range runs backwards"));
    }
    Ok((lo, hi))
}

fn split_range(spec: &str) -> Option<(&str, &str)> {
    if spec.starts_with("U+") {
        let at = spec.find("-U+")?;
        return Some((&spec[..at], &spec[at + 1..]));
    }
    let mut chars = spec.char_indices();
    chars.next()?;
    let (dash, second) = chars.next()?;
    let (last, _) = chars.next()?;
    if second == '-' && chars.next().is_none() {
        Some((&spec[..dash], &spec[last..]))
    } else {
        None
    }
}

fn parse_code_point(text: &str) -> Result<Xchar, String> {
    if let Some(hex) = text.strip_prefix("U+") {
        let code = u32::from_str_radix(hex, 16).map_err(|e| format!("bad hex `{hex}`: {e}"))?;
        return i32::try_from(code)
            .ok()
            .and_then(Xchar::new)
            .ok_or_else(|| format!("U+{hex} is beyond U+10FFFF"));
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Xchar::from(c)),
        _ => Err("expected one character, a range or U+ notation".to_string()),
    }
}

/// Union of a list of character specs.
pub fn parse_char_set(specs: &[String]) -> Result<CharSet, SyntaxError> {
    let mut set = CharSet::new();
    for spec in specs {
        let (lo, hi) = parse_char_spec(spec)?;
        set.add_range(lo, hi);
    }
    Ok(set)
}

/// Class-code positions of one token, resolved against the partition.
struct TokenPlan {
    pattern: Vec<Vec<ClassCode>>,
    lookahead: Vec<Vec<ClassCode>>,
    suffix: Vec<Vec<ClassCode>>,
    blank_run: Option<BlankRun>,
}

struct Resolver<'a> {
    partition: &'a ClassPartition,
    table: &'a ClassTable,
}

impl Resolver<'_> {
    fn plan(&self, token: &TokenConfig) -> Result<TokenPlan, SyntaxError> {
        let blank_run = match &token.blank_run {
            Some(run) => {
                if !token.lookahead.is_empty() {
                    return Err(SyntaxError::LookaheadWithBlankRun(token.name.clone()));
                }
                Some(BlankRun {
                    codes: self.category_codes(&token.name, &run.category)?,
                    max_scan: run.max_scan,
                    include_in_fallback: run.include_in_fallback,
                })
            },
            None => None,
        };
        Ok(TokenPlan {
            pattern: self.positions(&token.name, &token.pattern)?,
            lookahead: self.positions(&token.name, &token.lookahead)?,
            suffix: self.positions(&token.name, &token.suffix)?,
            blank_run,
        })
    }

    fn category_codes(&self, token: &str, category: &str) -> Result<Vec<ClassCode>, SyntaxError> {
        let id = self
            .partition
            .category_id(category)
            .ok_or_else(|| SyntaxError::UnknownCategory {
                token: token.to_string(),
                category: category.to_string(),
            })?;
        Ok(self.partition.codes_for(id))
    }

    fn positions(&self, token: &str, elements: &[String]) -> Result<Vec<Vec<ClassCode>>, SyntaxError> {
        let mut positions = Vec::new();
        for element in elements {
            match category_ref(element) {
                Some(category) => positions.push(self.category_codes(token, category)?),
                None => positions.extend(
                    element
                        .chars()
                        .map(|c| vec![self.table.lookup(Xchar::from(c))]),
                ),
            }
        }
        Ok(positions)
    }
}

/// One vocabulary of a compiled syntax.
#[derive(Debug)]
pub struct Mode {
    name: String,
    recognizer: Recognizer,
    transitions: FxHashMap<Token, ModeId>,
}

impl Mode {
    /// Mode name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The recognizer for this vocabulary.
    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// Mode entered after `token`, if it switches modes.
    pub fn next_mode(&self, token: Token) -> Option<ModeId> {
        self.transitions.get(&token).copied()
    }
}

/// A compiled syntax: shared class table, per-mode recognizers and token
/// names.
#[derive(Debug)]
pub struct CompiledSyntax {
    name: String,
    table: Arc<ClassTable>,
    partition: ClassPartition,
    token_names: Vec<String>,
    modes: IndexMap<String, Mode>,
    non_sgml: CharSet,
}

impl CompiledSyntax {
    /// Syntax name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class table shared by every mode.
    pub fn table(&self) -> &Arc<ClassTable> {
        &self.table
    }

    /// The partition the table was built from.
    pub fn partition(&self) -> &ClassPartition {
        &self.partition
    }

    /// Characters reported as non-SGML.
    pub fn non_sgml(&self) -> &CharSet {
        &self.non_sgml
    }

    /// The mode with index `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a mode of this syntax.
    pub fn mode(&self, id: ModeId) -> &Mode {
        &self.modes[id]
    }

    /// Index of the mode called `name`.
    pub fn mode_id(&self, name: &str) -> Option<ModeId> {
        self.modes.get_index_of(name)
    }

    /// All modes, in declaration order.
    pub fn modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.values()
    }

    /// The mode a stream starts in.
    pub fn initial_mode(&self) -> ModeId {
        0
    }

    /// Name of `token`; `None` for [`Token::UNRECOGNIZED`] and unknown ids.
    pub fn token_name(&self, token: Token) -> Option<&str> {
        let index = (token.id() as usize).checked_sub(1)?;
        self.token_names.get(index).map(String::as_str)
    }

    /// The token called `name`.
    pub fn token(&self, name: &str) -> Option<Token> {
        self.token_names
            .iter()
            .position(|n| n == name)
            .map(|index| Token(index as u32 + 1))
    }

    /// Class code of `c` and the categories containing it.
    pub fn classify(&self, c: Xchar) -> (ClassCode, Vec<&str>) {
        let code = self.table.lookup(c);
        let categories = self
            .partition
            .classes()
            .get(code as usize)
            .map(|class| self.partition.category_names(class.categories()))
            .unwrap_or_default();
        (code, categories)
    }

    /// Tokenizes `source` from the initial mode.
    pub fn tokenize<'a>(&'a self, source: &'a str, handler: &'a Handler) -> TokenStream<'a> {
        TokenStream::new(self, source, handler)
    }
}
