//! Token streams over a compiled syntax.

use sgmlx_util::{Handler, Span};

use crate::cursor::SourceCursor;
use crate::syntax::{CompiledSyntax, ModeId};
use crate::token::Token;

/// One recognized token with its location and the mode it was read in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lexeme {
    /// The token.
    pub token: Token,
    /// Where it was read.
    pub span: Span,
    /// Mode active when it was read.
    pub mode: ModeId,
}

/// Iterates the tokens of a source text, switching modes as the syntax's
/// transitions dictate.
///
/// # Example
///
/// ```
/// use sgmlx_lex::SyntaxConfig;
/// use sgmlx_util::Handler;
///
/// let syntax = SyntaxConfig::reference().unwrap().compile().unwrap();
/// let handler = Handler::new();
/// let names: Vec<_> = syntax
///     .tokenize("<p>", &handler)
///     .map(|lexeme| syntax.token_name(lexeme.token).unwrap_or("data"))
///     .collect();
/// assert_eq!(names, ["stago", "name_start", "tagc"]);
/// ```
pub struct TokenStream<'a> {
    syntax: &'a CompiledSyntax,
    cursor: SourceCursor<'a>,
    handler: &'a Handler,
    mode: ModeId,
}

impl<'a> TokenStream<'a> {
    /// Starts a stream in the syntax's initial mode.
    pub fn new(syntax: &'a CompiledSyntax, source: &'a str, handler: &'a Handler) -> Self {
        let mut cursor = SourceCursor::new(source);
        if !syntax.non_sgml().is_empty() {
            cursor = cursor.with_non_sgml(syntax.non_sgml());
        }
        Self {
            syntax,
            cursor,
            handler,
            mode: syntax.initial_mode(),
        }
    }

    /// Starts in `mode` instead of the initial mode.
    ///
    /// # Panics
    ///
    /// Panics if `mode` is not a mode of the syntax.
    pub fn with_mode(mut self, mode: ModeId) -> Self {
        assert!(
            mode < self.syntax.modes().count(),
            "mode {mode} is not defined"
        );
        self.mode = mode;
        self
    }

    /// The mode the next token will be read in.
    pub fn mode(&self) -> ModeId {
        self.mode
    }

    /// The underlying cursor.
    pub fn cursor(&self) -> &SourceCursor<'a> {
        &self.cursor
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        if self.cursor.is_at_end() {
            return None;
        }
        let mode = self.mode;
        let current = self.syntax.mode(mode);
        let (token, span) = current
            .recognizer()
            .recognize_spanned(&mut self.cursor, self.handler);
        if let Some(next) = current.next_mode(token) {
            self.mode = next;
        }
        Some(Lexeme { token, span, mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxConfig;

    const SYNTAX: &str = r#"
name = "modes"

[categories]
letter = ["a-z"]

[[tokens]]
name = "open"
pattern = ["["]
modes = ["outer"]

[[tokens]]
name = "close"
pattern = ["]"]
modes = ["inner"]

[[tokens]]
name = "word"
pattern = ["{letter}"]
modes = ["inner"]

[[modes]]
name = "outer"
switch = { open = "inner" }

[[modes]]
name = "inner"
switch = { close = "outer" }
"#;

    fn names(syntax: &CompiledSyntax, source: &str) -> Vec<String> {
        let handler = Handler::new();
        syntax
            .tokenize(source, &handler)
            .map(|l| syntax.token_name(l.token).unwrap_or("#data").to_string())
            .collect()
    }

    #[test]
    fn test_modes_switch() {
        let syntax = SyntaxConfig::from_toml(SYNTAX).unwrap().compile().unwrap();
        assert_eq!(
            names(&syntax, "a[b]c"),
            ["#data", "open", "word", "close", "#data"]
        );
    }

    #[test]
    fn test_lexeme_modes_and_spans() {
        let syntax = SyntaxConfig::from_toml(SYNTAX).unwrap().compile().unwrap();
        let handler = Handler::new();
        let lexemes: Vec<_> = syntax.tokenize("[x]", &handler).collect();
        assert_eq!(lexemes.len(), 3);
        assert_eq!(lexemes[0].mode, 0);
        assert_eq!(lexemes[1].mode, 1);
        assert_eq!(lexemes[1].span, Span::new(1, 2, 1, 2));
        assert_eq!(lexemes[2].mode, 1);
    }

    #[test]
    fn test_start_mode() {
        let syntax = SyntaxConfig::from_toml(SYNTAX).unwrap().compile().unwrap();
        let handler = Handler::new();
        let inner = syntax.mode_id("inner").unwrap();
        let mut stream = syntax.tokenize("x]", &handler).with_mode(inner);
        assert_eq!(stream.next().map(|l| l.token), syntax.token("word"));
        assert_eq!(stream.next().map(|l| l.token), syntax.token("close"));
        assert_eq!(stream.mode(), 0);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_empty_source() {
        let syntax = SyntaxConfig::from_toml(SYNTAX).unwrap().compile().unwrap();
        assert!(names(&syntax, "").is_empty());
    }
}
