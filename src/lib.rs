//! pipesh: a small interactive shell with in-process applications.
//!
//! A command line is tokenized, built into a [`Command`](parse::Command)
//! tree (calls, pipes and `;` sequences), and evaluated by a
//! [`Shell`](eval::Shell) against a registry of applications. Pipes are
//! synchronous and fully buffered; command substitution is a recursive
//! evaluation with a capped depth.
//!
//! # Architecture
//!
//! - **[`parse`]**: Lexer and command builder producing the command tree.
//! - **[`eval`]**: Shell evaluator, environment, argument resolution, application registry.
//! - **[`redirect`]**: Extraction and opening of `<`/`>` redirections.
//! - **[`apps`]**: The builtin applications (echo, cat, cut, sort, ...).
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: `simplelog` setup for the file and verbose stderr logs.
//! - **[`error`]**: [`ShellError`](error::ShellError) and the result alias.

/// Application trait, context and builtin implementations.
pub mod apps;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error types surfaced by parsing and evaluation.
pub mod error;
/// Evaluation engine: shell, environment, resolver, registry.
pub mod eval;
/// Logger initialization.
pub mod logging;
/// Command line parsing: lexer, builder, command types.
pub mod parse;
/// I/O redirection.
pub mod redirect;

use error::ShellError;

/// Run one command line with the default config in the process's current
/// directory and return what it wrote to stdout.
///
/// This is the main entry point for simple usage. For a persistent
/// environment or a user config, build an [`eval::Shell`] directly.
pub fn run(line: &str) -> Result<String, ShellError> {
    let env = eval::Environment::from_process()?;
    let mut shell = eval::Shell::new(env);
    let mut output = Vec::new();
    shell.execute(line, &mut output)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
