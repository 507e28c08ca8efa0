//! Shared helpers for sgmlt commands.

use std::path::Path;

use sgmlx_lex::{CompiledSyntax, ModeId, SyntaxConfig};
use sgmlx_util::{Diagnostic, SourceSnippet};

use crate::error::{Result, SgmltError};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per item
    Text,
    /// A JSON document
    Json,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Resolve the effective format: the flag if given, else the config value.
    pub fn resolve(flag: Option<&str>, configured: &str) -> Result<Self> {
        match flag {
            Some(name) => Self::parse(name)
                .ok_or_else(|| SgmltError::Validation(format!("unknown output format: {}", name))),
            None => Self::parse(configured).ok_or_else(|| {
                SgmltError::Config(format!("invalid output format in config: {}", configured))
            }),
        }
    }
}

/// Reads the syntax description at `path`, or the built-in reference syntax.
pub fn load_syntax_config(path: Option<&Path>) -> Result<SyntaxConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                SgmltError::FileOperation(format!("{}: {}", path.display(), e))
            })?;
            Ok(SyntaxConfig::from_toml(&text)?)
        }
        None => Ok(SyntaxConfig::reference()?),
    }
}

/// The mode called `name`, or the initial mode.
pub fn resolve_mode(syntax: &CompiledSyntax, name: Option<&str>) -> Result<ModeId> {
    match name {
        Some(name) => syntax
            .mode_id(name)
            .ok_or_else(|| SgmltError::Validation(format!("unknown mode: {}", name))),
        None => Ok(syntax.initial_mode()),
    }
}

/// Renders a diagnostic with the offending source line underneath.
pub fn render_diagnostic(path: &Path, source: &str, diagnostic: Diagnostic) -> String {
    let mut diagnostic = diagnostic;
    if diagnostic.snippet.is_none() {
        if let Ok(snippet) = SourceSnippet::from_span(source, diagnostic.span) {
            diagnostic = diagnostic.with_snippet(snippet);
        }
    }
    format!("{}: {}", path.display(), diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgmlx_util::{DiagnosticBuilder, DiagnosticCode, Span};

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn test_output_format_flag_overrides_config() {
        assert_eq!(
            OutputFormat::resolve(Some("json"), "text").unwrap(),
            OutputFormat::Json
        );
        assert!(matches!(
            OutputFormat::resolve(Some("xml"), "text"),
            Err(SgmltError::Validation(_))
        ));
        assert!(matches!(
            OutputFormat::resolve(None, "xml"),
            Err(SgmltError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_mode() {
        let syntax = load_syntax_config(None).unwrap().compile().unwrap();
        assert_eq!(resolve_mode(&syntax, None).unwrap(), 0);
        assert_eq!(
            resolve_mode(&syntax, Some("tag")).unwrap(),
            syntax.mode_id("tag").unwrap()
        );
        assert!(resolve_mode(&syntax, Some("nowhere")).is_err());
    }

    #[test]
    fn test_missing_syntax_file() {
        let result = load_syntax_config(Some(Path::new("/nonexistent/syntax.toml")));
        assert!(matches!(result, Err(SgmltError::FileOperation(_))));
    }

    #[test]
    fn test_render_diagnostic_adds_snippet() {
        let source = "ab\u{1}c";
        let diagnostic = DiagnosticBuilder::error("non-SGML character U+0001")
            .code(DiagnosticCode::E_LEXER_NON_SGML_CHAR)
            .span(Span::new(2, 3, 1, 3))
            .build();
        let rendered = render_diagnostic(Path::new("doc.sgm"), source, diagnostic);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "doc.sgm: error[E1001]: non-SGML character U+0001 at 1:3");
        assert_eq!(lines[2], "    |   ^");
    }

    #[test]
    fn test_render_diagnostic_outside_source_keeps_message() {
        let diagnostic = DiagnosticBuilder::error("lost")
            .span(Span::new(8, 9, 1, 9))
            .build();
        let rendered = render_diagnostic(Path::new("doc.sgm"), "ab", diagnostic);
        assert_eq!(rendered, "doc.sgm: error: lost at 1:9");
    }
}
