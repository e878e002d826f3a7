//! The `jsl` Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use clap::Parser;
use miette::Diagnostic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use walkdir::WalkDir;

use crate::ast::Root;
use crate::cli::args::{Command, JslArgs};
use crate::dialect::Dialect;
use crate::errors::{DialectError, SourceContext, SourceDiagnostic};
use crate::lexer::tokenize;
use crate::syntax;

pub mod args;
pub mod output;

/// Extension of source files picked up by `check`.
pub const SOURCE_EXTENSION: &str = "jsl";

/// Everything a CLI command can fail with.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Cannot read {}: {source}", .path.display())]
    #[diagnostic(code(jaslang::cli::read))]
    Read { path: PathBuf, source: io::Error },

    #[error("No .jsl files found under {}", .path.display())]
    #[diagnostic(code(jaslang::cli::no_sources))]
    NoSources { path: PathBuf },

    #[error("{failed} of {total} files failed to parse")]
    #[diagnostic(code(jaslang::cli::check))]
    CheckFailed { failed: usize, total: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dialect(#[from] DialectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(SourceDiagnostic),

    #[error("Cannot write output: {0}")]
    #[diagnostic(code(jaslang::cli::io))]
    Io(#[from] io::Error),

    #[error("Cannot encode JSON: {0}")]
    #[diagnostic(code(jaslang::cli::json))]
    Json(#[from] serde_json::Error),
}

/// The main entry point for the CLI.
pub fn run() {
    let args = JslArgs::parse();

    let result = load_dialect(args.dialect.as_deref()).and_then(|dialect| {
        // Dispatch to the appropriate subcommand handler.
        match &args.command {
            Command::Tokens { file, json } => handle_tokens(&dialect, file, *json),
            Command::Ast { file } => handle_ast(&dialect, file),
            Command::Check { path } => handle_check(&dialect, path, args.route),
        }
    });

    if let Err(err) = result {
        if let Err(io_err) = report(err, args.route) {
            output::print_error(CliError::Io(io_err));
        }
        process::exit(1);
    }
}

fn load_dialect(path: Option<&Path>) -> Result<Dialect, CliError> {
    match path {
        Some(path) => Ok(Dialect::load(path)?),
        None => Ok(Dialect::default()),
    }
}

fn read_source(path: &Path) -> Result<SourceContext, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceContext::from_file(path.display().to_string(), content))
}

fn parse_source(dialect: &Dialect, source: &SourceContext) -> Result<Root, CliError> {
    syntax::parse_with(dialect, &source.content).map_err(|err| CliError::Parse(source.diagnose(err)))
}

/// Prints `err`, preceded by the grammar route when `route` is set and the
/// error carries one.
fn report(err: CliError, route: bool) -> io::Result<()> {
    if let (true, CliError::Parse(diagnostic)) = (route, &err) {
        if let Some(trace) = diagnostic.error.route() {
            output::print_route(trace)?;
        }
    }
    output::print_error(err);
    Ok(())
}

/// Handles the `tokens` subcommand.
fn handle_tokens(dialect: &Dialect, file: &Path, json: bool) -> Result<(), CliError> {
    let source = read_source(file)?;
    let lexemes = tokenize(&dialect.lexer, &source.content)
        .map_err(|err| CliError::Parse(source.diagnose(err.into())))?;

    if json {
        output::print_json(&lexemes)?;
    } else {
        output::print_lexemes(&lexemes)?;
    }
    Ok(())
}

/// Handles the `ast` subcommand.
fn handle_ast(dialect: &Dialect, file: &Path) -> Result<(), CliError> {
    let source = read_source(file)?;
    let root = parse_source(dialect, &source)?;
    output::print_json(&root)?;
    Ok(())
}

/// Handles the `check` subcommand.
fn handle_check(dialect: &Dialect, path: &Path, route: bool) -> Result<(), CliError> {
    let files = discover_sources(path);
    if files.is_empty() {
        return Err(CliError::NoSources {
            path: path.to_path_buf(),
        });
    }

    let mut failed = 0;
    for file in &files {
        let outcome = read_source(file).and_then(|source| parse_source(dialect, &source));
        output::print_status(file, outcome.is_ok())?;
        if let Err(err) = outcome {
            failed += 1;
            report(err, route)?;
        }
    }

    output::print_summary(files.len(), failed)?;
    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

/// `path` itself if it is a file, otherwise every source file beneath it in
/// name order.
fn discover_sources(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == SOURCE_EXTENSION)
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}
