//! Classes command implementation.
//!
//! Shows how a syntax's class table sees each character of a string.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use sgmlx_lex::{ClassCode, CompiledSyntax, Xchar};

use crate::commands::common::{load_syntax_config, OutputFormat};
use crate::config::Config;
use crate::error::Result;

/// Arguments for the classes command.
#[derive(Debug, Clone, Default)]
pub struct ClassesArgs {
    /// Characters to classify.
    pub text: String,
    /// Syntax description overriding the configured one.
    pub syntax: Option<PathBuf>,
    /// Output format overriding the configured one.
    pub format: Option<String>,
    /// Also classify the end-of-input sentinel.
    pub eof: bool,
}

/// Classification of one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecord {
    /// `U+XXXX`, or `EOF`.
    pub char: String,
    /// The character itself when printable.
    pub literal: Option<String>,
    /// Its class code.
    pub class: ClassCode,
    /// Categories containing it.
    pub categories: Vec<String>,
}

/// Classifies every character of `text`, then the sentinel if `eof`.
pub fn classify_text(syntax: &CompiledSyntax, text: &str, eof: bool) -> Vec<ClassRecord> {
    let chars = text
        .chars()
        .map(|c| (Xchar::from(c), (!c.is_control()).then(|| c.to_string())));
    let sentinel = eof.then_some((Xchar::EOF, None));

    chars
        .chain(sentinel)
        .map(|(x, literal)| {
            let (class, categories) = syntax.classify(x);
            ClassRecord {
                char: x.to_string(),
                literal,
                class,
                categories: categories.into_iter().map(str::to_string).collect(),
            }
        })
        .collect()
}

fn format_record(record: &ClassRecord) -> String {
    let literal = record
        .literal
        .as_deref()
        .map_or_else(|| "-".to_string(), |l| format!("{:?}", l));
    let categories = if record.categories.is_empty() {
        "-".to_string()
    } else {
        record.categories.join(",")
    };
    format!(
        "{}\t{}\tclass {}\t{}",
        record.char, literal, record.class, categories
    )
}

/// Run the classes command with the given arguments.
pub fn run_classes(args: ClassesArgs, config: Config) -> Result<()> {
    let format = OutputFormat::resolve(args.format.as_deref(), &config.format)?;
    let syntax_path = args.syntax.as_deref().or(config.syntax.as_deref());
    let syntax = load_syntax_config(syntax_path)?.compile()?;

    tracing::debug!(
        syntax = syntax.name(),
        classes = syntax.partition().class_count(),
        "classifying"
    );

    let records = classify_text(&syntax, &args.text, args.eof);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for record in &records {
                writeln!(out, "{}", format_record(record))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgmlx_lex::SyntaxConfig;

    fn reference() -> CompiledSyntax {
        SyntaxConfig::reference().unwrap().compile().unwrap()
    }

    #[test]
    fn test_classify_categories() {
        let syntax = reference();
        let records = classify_text(&syntax, "a1 ", false);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].char, "U+0061");
        assert_eq!(records[0].categories, ["namestart"]);
        assert_eq!(records[1].categories, ["digit"]);
        assert_eq!(records[2].categories, ["blank"]);
    }

    #[test]
    fn test_same_class_for_equivalent_characters() {
        let syntax = reference();
        let records = classify_text(&syntax, "xyXY", false);
        assert!(records.windows(2).all(|w| w[0].class == w[1].class));
    }

    #[test]
    fn test_eof_and_control_characters() {
        let syntax = reference();
        let records = classify_text(&syntax, "\t", true);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].literal, None);
        assert_eq!(records[1].char, "EOF");
        assert_eq!(format_record(&records[1]).split('\t').nth(1), Some("-"));
    }

    #[test]
    fn test_format_record() {
        let record = ClassRecord {
            char: "U+003C".to_string(),
            literal: Some("<".to_string()),
            class: 4,
            categories: Vec::new(),
        };
        assert_eq!(format_record(&record), "U+003C\t\"<\"\tclass 4\t-");
    }
}
