//! sgmlt - inspect how an SGML-family syntax tokenizes text.
//!
//! Parses the command line with clap, sets up logging and configuration,
//! and dispatches to a command handler.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_classes, run_tokenize, ClassesArgs, TokenizeArgs};
use config::Config;

/// sgmlt - Tokenize documents with SGML-family concrete syntaxes
#[derive(Parser, Debug)]
#[command(name = "sgmlt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tokenize documents with SGML-family concrete syntaxes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "SGMLT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SGMLT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "SGMLT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the sgmlt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the token stream of one or more files
    ///
    /// Files are tokenized in parallel, each with its own compiled copy of
    /// the syntax. Diagnostics go to standard error.
    Tokenize(TokenizeCommand),

    /// Show the class code and categories of each character
    Classes(ClassesCommand),
}

/// Arguments for the tokenize subcommand.
#[derive(Parser, Debug)]
struct TokenizeCommand {
    /// Input files to tokenize
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Syntax description (default: from config, else the reference syntax)
    #[arg(short, long)]
    syntax: Option<PathBuf>,

    /// Mode to start in (default: from config, else the first mode)
    #[arg(short, long)]
    mode: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'F', long)]
    format: Option<String>,

    /// Omit unrecognized character runs from the output
    #[arg(long)]
    no_data: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    jobs: Option<usize>,
}

/// Arguments for the classes subcommand.
#[derive(Parser, Debug)]
struct ClassesCommand {
    /// Characters to classify
    text: String,

    /// Syntax description (default: from config, else the reference syntax)
    #[arg(short, long)]
    syntax: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'F', long)]
    format: Option<String>,

    /// Also classify the end-of-input sentinel
    #[arg(long)]
    eof: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    let config = load_config(cli.config.as_deref())?;

    execute_command(cli.command, cli.verbose, config)
}

/// Initialize the logging system. Logs go to standard error so that
/// standard output carries only command output.
fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

fn load_config(config_path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.context("Failed to load configuration")
}

fn execute_command(command: Commands, verbose: bool, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Tokenize(args) => {
            let tokenize_args = TokenizeArgs {
                verbose,
                files: args.files,
                syntax: args.syntax,
                mode: args.mode,
                format: args.format,
                no_data: args.no_data,
                jobs: args.jobs,
            };
            run_tokenize(tokenize_args, config).context("tokenize failed")
        }
        Commands::Classes(args) => {
            let classes_args = ClassesArgs {
                text: args.text,
                syntax: args.syntax,
                format: args.format,
                eof: args.eof,
            };
            run_classes(classes_args, config).context("classes failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_tokenize() {
        let cli = Cli::parse_from(["sgmlt", "tokenize", "a.sgm", "b.sgm"]);
        if let Commands::Tokenize(args) = cli.command {
            assert_eq!(args.files, [PathBuf::from("a.sgm"), PathBuf::from("b.sgm")]);
            assert!(!args.no_data);
        } else {
            panic!("Expected Tokenize command");
        }
    }

    #[test]
    fn test_cli_parse_tokenize_requires_files() {
        assert!(Cli::try_parse_from(["sgmlt", "tokenize"]).is_err());
    }

    #[test]
    fn test_cli_parse_tokenize_options() {
        let cli = Cli::parse_from([
            "sgmlt", "tokenize", "doc.sgm", "--mode", "tag", "-F", "json", "--no-data", "-j", "2",
        ]);
        if let Commands::Tokenize(args) = cli.command {
            assert_eq!(args.mode.as_deref(), Some("tag"));
            assert_eq!(args.format.as_deref(), Some("json"));
            assert!(args.no_data);
            assert_eq!(args.jobs, Some(2));
        } else {
            panic!("Expected Tokenize command");
        }
    }

    #[test]
    fn test_cli_parse_classes() {
        let cli = Cli::parse_from(["sgmlt", "classes", "<a>", "--eof"]);
        if let Commands::Classes(args) = cli.command {
            assert_eq!(args.text, "<a>");
            assert!(args.eof);
        } else {
            panic!("Expected Classes command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::parse_from([
            "sgmlt", "--verbose", "--no-color", "--config", "/tmp/sgmlt.toml", "classes", "x",
        ]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sgmlt.toml")));
    }
}
