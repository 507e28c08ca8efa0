//! Command modules for the sgmlt CLI.
//!
//! Each subcommand lives in its own file and exposes an `*Args` struct plus
//! a `run_*` entry point.

pub mod common;

pub mod classes;
pub mod tokenize;

pub use classes::{run_classes, ClassesArgs};
pub use tokenize::{run_tokenize, TokenizeArgs};
