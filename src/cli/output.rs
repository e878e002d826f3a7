//! Handles all user-facing output for the CLI.
//!
//! Data goes to stdout, plain or as JSON. Status lines are coloured when the
//! stream is a terminal. Errors go to stderr as `miette` reports.

use miette::Diagnostic;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::lexer::Lexeme;

// ============================================================================
// STREAMS
// ============================================================================

/// Colour only when writing to a terminal.
pub fn color_choice(stream: atty::Stream) -> ColorChoice {
    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(atty::Stream::Stdout))
}

fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(atty::Stream::Stderr))
}

// ============================================================================
// DATA OUTPUT
// ============================================================================

/// One lexeme per line: position, kind, then the source text quoted.
pub fn print_lexemes(lexemes: &[Lexeme]) -> io::Result<()> {
    let mut out = stdout();
    for lexeme in lexemes {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "{:>4}:{:<4}", lexeme.line, lexeme.column)?;
        out.reset()?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, " {:<12}", lexeme.kind.as_str())?;
        out.reset()?;
        writeln!(out, " {:?}", lexeme.text)?;
    }
    Ok(())
}

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// STATUS OUTPUT
// ============================================================================

/// `ok` or `FAIL` followed by the file checked.
pub fn print_status(path: &Path, passed: bool) -> io::Result<()> {
    let mut out = stdout();
    let (label, color) = if passed {
        ("  ok", Color::Green)
    } else {
        ("FAIL", Color::Red)
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()?;
    writeln!(out, " {}", path.display())
}

pub fn print_summary(total: usize, failed: usize) -> io::Result<()> {
    let mut out = stdout();
    let color = if failed == 0 { Color::Green } else { Color::Red };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "{total} checked, {failed} failed")?;
    out.reset()
}

/// The grammar route leading up to a rejected token.
pub fn print_route(route: &str) -> io::Result<()> {
    let mut err = stderr();
    err.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(err, "route")?;
    err.reset()?;
    writeln!(err, ": {route}")
}

// ============================================================================
// ERROR OUTPUT
// ============================================================================

/// Render any diagnostic to stderr through miette's report handler.
pub fn print_error<D>(error: D)
where
    D: Diagnostic + Send + Sync + 'static,
{
    eprintln!("{:?}", miette::Report::new(error));
}
