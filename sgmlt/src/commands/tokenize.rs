//! Tokenize command implementation.
//!
//! Runs every input file through a compiled syntax and prints the token
//! stream. Files are processed in parallel; each worker compiles its own
//! copy of the syntax, so nothing is shared between parses.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use sgmlx_lex::{CompiledSyntax, ModeId, SyntaxConfig};
use sgmlx_util::{Diagnostic, Handler};
use tracing::{debug, warn};

use crate::commands::common::{load_syntax_config, render_diagnostic, resolve_mode, OutputFormat};
use crate::config::Config;
use crate::error::{Result, SgmltError};

/// Name printed for runs of unrecognized characters.
pub const DATA: &str = "#data";

/// Arguments for the tokenize command.
#[derive(Debug, Clone, Default)]
pub struct TokenizeArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Input files to tokenize.
    pub files: Vec<PathBuf>,
    /// Syntax description overriding the configured one.
    pub syntax: Option<PathBuf>,
    /// Start mode overriding the configured one.
    pub mode: Option<String>,
    /// Output format overriding the configured one.
    pub format: Option<String>,
    /// Leave runs of unrecognized characters out of the output.
    pub no_data: bool,
    /// Number of parallel jobs.
    pub jobs: Option<usize>,
}

/// One entry of the printed token stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    /// Token name, or `#data` for unrecognized characters.
    pub token: String,
    /// Numeric token id (0 for data).
    pub id: u32,
    /// Mode the token was read in.
    pub mode: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character.
    pub end: usize,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// The source text of the token.
    pub text: String,
}

/// A diagnostic as it appears in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    /// Diagnostic code, if any.
    pub code: Option<String>,
    /// Message.
    pub message: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            code: diagnostic.code.map(|code| code.as_str()),
            message: diagnostic.message.clone(),
            line: diagnostic.span.line,
            column: diagnostic.span.column,
        }
    }
}

/// Everything produced for one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The input file.
    pub path: PathBuf,
    /// Name of the syntax used.
    pub syntax: String,
    /// The token stream.
    pub tokens: Vec<TokenRecord>,
    /// Diagnostics raised while reading the file.
    pub diagnostics: Vec<DiagnosticRecord>,
    #[serde(skip)]
    rendered: Vec<String>,
}

/// Tokenizes `source`, merging adjacent unrecognized characters read in the
/// same mode into a single `#data` record (or dropping them).
pub fn collect_tokens(
    syntax: &CompiledSyntax,
    source: &str,
    mode: ModeId,
    show_data: bool,
    handler: &Handler,
) -> Vec<TokenRecord> {
    let mut records: Vec<TokenRecord> = Vec::new();
    for lexeme in syntax.tokenize(source, handler).with_mode(mode) {
        let mode_name = syntax.mode(lexeme.mode).name();
        let span = lexeme.span;

        if !lexeme.token.is_recognized() {
            if !show_data {
                continue;
            }
            if let Some(last) = records.last_mut() {
                if last.id == 0 && last.end == span.start && last.mode == mode_name {
                    last.end = span.end;
                    last.text.push_str(&source[span.start..span.end]);
                    continue;
                }
            }
        }

        records.push(TokenRecord {
            token: syntax.token_name(lexeme.token).unwrap_or(DATA).to_string(),
            id: lexeme.token.id(),
            mode: mode_name.to_string(),
            start: span.start,
            end: span.end,
            line: span.line,
            column: span.column,
            text: source[span.start..span.end].to_string(),
        });
    }
    records
}

/// Tokenize command handler.
pub struct TokenizeCommand {
    args: TokenizeArgs,
    config: Config,
}

impl TokenizeCommand {
    /// Create a new TokenizeCommand.
    pub fn new(args: TokenizeArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        self.validate_input_files()?;

        let format = OutputFormat::resolve(self.args.format.as_deref(), &self.config.format)?;
        let syntax_path = self.args.syntax.as_deref().or(self.config.syntax.as_deref());
        let syntax_config = load_syntax_config(syntax_path)?;
        let mode = self.args.mode.as_deref().or(self.config.mode.as_deref());

        // Fail once on a broken syntax or mode instead of once per file.
        let probe = syntax_config.compile()?;
        resolve_mode(&probe, mode)?;
        drop(probe);

        let results = self.process_all_files(&syntax_config, mode)?;

        let mut reports = Vec::with_capacity(results.len());
        let mut files_failed = 0;
        for (path, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    files_failed += 1;
                    eprintln!("error: failed to tokenize {}: {}", path.display(), e);
                }
            }
        }

        self.print_reports(&reports, format)?;
        self.report_diagnostics(&reports);

        if self.args.verbose {
            eprintln!(
                "Tokenized {} file(s) in {:.3}s, {} failed",
                reports.len(),
                start_time.elapsed().as_secs_f64(),
                files_failed
            );
        }

        if files_failed > 0 {
            return Err(SgmltError::CommandExecution(format!(
                "{} file(s) could not be tokenized",
                files_failed
            )));
        }
        Ok(())
    }

    fn validate_input_files(&self) -> Result<()> {
        if self.args.files.is_empty() {
            return Err(SgmltError::Validation("no input files".to_string()));
        }
        Ok(())
    }

    fn show_data(&self) -> bool {
        !self.args.no_data && self.config.show_data
    }

    /// Tokenize every file on a rayon pool, keeping input order.
    fn process_all_files(
        &self,
        syntax_config: &SyntaxConfig,
        mode: Option<&str>,
    ) -> Result<Vec<(PathBuf, Result<FileReport>)>> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = self.args.jobs {
            builder = builder.num_threads(jobs);
        }
        let pool = builder
            .build()
            .map_err(|e| SgmltError::Config(format!("Failed to start worker pool: {}", e)))?;

        Ok(pool.install(|| {
            self.args
                .files
                .par_iter()
                .map(|path| (path.clone(), self.tokenize_file(path, syntax_config, mode)))
                .collect()
        }))
    }

    fn tokenize_file(
        &self,
        path: &Path,
        syntax_config: &SyntaxConfig,
        mode: Option<&str>,
    ) -> Result<FileReport> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| SgmltError::FileOperation(format!("{}: {}", path.display(), e)))?;
        let syntax = syntax_config.compile()?;
        let mode = resolve_mode(&syntax, mode)?;

        let handler = Handler::new();
        let tokens = collect_tokens(&syntax, &source, mode, self.show_data(), &handler);
        debug!(
            path = %path.display(),
            tokens = tokens.len(),
            errors = handler.error_count(),
            "tokenized file"
        );
        let diagnostics = handler.take_diagnostics();

        Ok(FileReport {
            path: path.to_path_buf(),
            syntax: syntax.name().to_string(),
            tokens,
            diagnostics: diagnostics.iter().map(DiagnosticRecord::from).collect(),
            rendered: diagnostics
                .into_iter()
                .map(|d| render_diagnostic(path, &source, d))
                .collect(),
        })
    }

    fn print_reports(&self, reports: &[FileReport], format: OutputFormat) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, reports)?;
                writeln!(out)?;
            }
            OutputFormat::Text => {
                let headers = reports.len() > 1;
                for report in reports {
                    if headers {
                        writeln!(out, "== {} ==", report.path.display())?;
                    }
                    for token in &report.tokens {
                        writeln!(out, "{}", format_token(token))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn report_diagnostics(&self, reports: &[FileReport]) {
        let mut errors = 0;
        for report in reports {
            for rendered in &report.rendered {
                eprintln!("{}", rendered);
            }
            errors += report.diagnostics.len();
        }
        if errors > 0 {
            warn!(errors, "input contains errors");
        }
    }
}

/// Formats one token as a text output line.
pub fn format_token(token: &TokenRecord) -> String {
    format!(
        "{}:{}\t{}\t{}\t{:?}",
        token.line, token.column, token.mode, token.token, token.text
    )
}

/// Run the tokenize command with the given arguments.
pub fn run_tokenize(args: TokenizeArgs, config: Config) -> Result<()> {
    TokenizeCommand::new(args, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> CompiledSyntax {
        SyntaxConfig::reference().unwrap().compile().unwrap()
    }

    fn tokens(source: &str, show_data: bool) -> Vec<TokenRecord> {
        let syntax = reference();
        let handler = Handler::new();
        collect_tokens(&syntax, source, syntax.initial_mode(), show_data, &handler)
    }

    #[test]
    fn test_data_runs_are_merged() {
        let records = tokens("hello <b>", true);
        let names: Vec<_> = records.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(names, [DATA, "stago", "name_start", "tagc"]);
        assert_eq!(records[0].text, "hello ");
        assert_eq!((records[0].start, records[0].end), (0, 6));
    }

    #[test]
    fn test_data_runs_split_on_mode_change() {
        // "x" in the literal and the "y" after the tag are in different modes
        let records = tokens("<a t=\"x\">y", true);
        let data: Vec<_> = records
            .iter()
            .filter(|r| r.token == DATA)
            .map(|r| (r.text.as_str(), r.mode.as_str()))
            .collect();
        assert_eq!(data, [("x", "tag_lit"), ("y", "content")]);
    }

    #[test]
    fn test_data_can_be_hidden() {
        let records = tokens("ab<c>de", false);
        assert!(records.iter().all(|r| r.id != 0));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_format_token() {
        let records = tokens("<p   >", true);
        assert_eq!(format_token(&records[2]), "1:3\ttag\ts_tagc\t\"   >\"");
    }

    #[test]
    fn test_empty_file_list_rejected() {
        let command = TokenizeCommand::new(TokenizeArgs::default(), Config::default());
        assert!(matches!(command.run(), Err(SgmltError::Validation(_))));
    }

    #[test]
    fn test_diagnostic_record() {
        let syntax = reference();
        let handler = Handler::new();
        collect_tokens(&syntax, "a\u{1}", 0, true, &handler);
        let diagnostics = handler.take_diagnostics();
        let record = DiagnosticRecord::from(&diagnostics[0]);
        assert_eq!(record.code.as_deref(), Some("E1001"));
        assert_eq!((record.line, record.column), (1, 2));
        assert!(!handler.has_errors());
    }
}
